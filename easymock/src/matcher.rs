// vim: tw=80
//! Per-argument matchers.
//!
//! An [`ArgMatcher`] is a type-erased predicate over one argument.  A
//! [`Matcher<T>`](Matcher) is the same thing tagged with the parameter type
//! it applies to, which is what the typed setup and verify helpers accept.
//! Any `T: PartialEq` converts into a literal `Matcher<T>`; the other kinds
//! come from the [`it`](crate::it) module.

use predicates::prelude::Predicate;
use predicates_tree::CaseTreeExt;
use std::{
    fmt::{self, Debug, Display},
    marker::PhantomData,
    sync::Arc
};

use crate::{
    arguments::ArgValue,
    signature::ParamType
};

/// Whether a range includes its endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Inclusive,
    Exclusive
}

impl Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RangeKind::Inclusive => f.write_str("Inclusive"),
            RangeKind::Exclusive => f.write_str("Exclusive"),
        }
    }
}

/// What sort of test an [`ArgMatcher`] performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Any,
    NotNull,
    Predicate,
    Range(RangeKind),
    OneOf,
    NoneOf,
    /// Exact equality with a value.  The default when a test passes a
    /// concrete value.
    Literal
}

trait ErasedPredicate: Send + Sync {
    fn eval(&self, arg: &dyn ArgValue) -> bool;

    /// Render why `arg` is rejected, or `None` if it's accepted.
    fn explain(&self, arg: &dyn ArgValue) -> Option<String>;
}

struct Typed<T, P> {
    pred: P,
    _t: PhantomData<fn(&T)>
}

impl<T, P> ErasedPredicate for Typed<T, P>
    where T: ArgValue, P: Predicate<T> + Send + Sync
{
    fn eval(&self, arg: &dyn ArgValue) -> bool {
        arg.downcast_ref::<T>()
            .map_or(false, |v| self.pred.eval(v))
    }

    fn explain(&self, arg: &dyn ArgValue) -> Option<String> {
        match arg.downcast_ref::<T>() {
            Ok(v) => self.pred.find_case(false, v)
                .map(|case| case.tree().to_string()),
            Err(_) => Some(format!("expected a value of type {}, got {:?}",
                                   std::any::type_name::<T>(), arg))
        }
    }
}

/// Accepts anything.  Backs the implicit records, whose matchers are never
/// used to resolve calls.
struct Always;

impl ErasedPredicate for Always {
    fn eval(&self, _arg: &dyn ArgValue) -> bool {
        true
    }

    fn explain(&self, _arg: &dyn ArgValue) -> Option<String> {
        None
    }
}

/// A predicate over a single argument of a live call.
///
/// Stateless and cheap to clone.
#[derive(Clone)]
pub struct ArgMatcher {
    kind: MatcherKind,
    param: ParamType,
    description: Arc<str>,
    pred: Arc<dyn ErasedPredicate>
}

impl ArgMatcher {
    pub(crate) fn new<T, P>(kind: MatcherKind, description: String, pred: P)
        -> Self
        where T: ArgValue, P: Predicate<T> + Send + Sync + 'static
    {
        ArgMatcher {
            kind,
            param: ParamType::of::<T>(),
            description: description.into(),
            pred: Arc::new(Typed{pred, _t: PhantomData})
        }
    }

    /// A wildcard for a parameter known only by its runtime type.
    pub(crate) fn any_of_type(param: ParamType) -> Self {
        ArgMatcher {
            kind: MatcherKind::Any,
            param,
            description: "it::any()".into(),
            pred: Arc::new(Always)
        }
    }

    pub fn kind(&self) -> MatcherKind {
        self.kind
    }

    /// The parameter type this matcher applies to.
    pub fn param(&self) -> ParamType {
        self.param
    }

    /// Does `arg` satisfy this matcher?  An argument of the wrong type never
    /// does.
    ///
    /// # Panics
    ///
    /// A panic inside a user-supplied predicate propagates unchanged.
    pub fn matches(&self, arg: &dyn ArgValue) -> bool {
        self.pred.eval(arg)
    }

    /// A tree describing why `arg` was rejected, or `None` if it matches.
    pub fn explain(&self, arg: &dyn ArgValue) -> Option<String> {
        self.pred.explain(arg)
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind == MatcherKind::Any
    }
}

impl Debug for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ArgMatcher")
            .field("kind", &self.kind)
            .field("param", &self.param.name())
            .field("description", &self.description)
            .finish()
    }
}

impl Display for ArgMatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// An [`ArgMatcher`] for parameters of type `T`.
pub struct Matcher<T> {
    inner: ArgMatcher,
    _t: PhantomData<fn(&T)>
}

impl<T: ArgValue> Matcher<T> {
    pub(crate) fn new<P>(kind: MatcherKind, description: String, pred: P)
        -> Self
        where P: Predicate<T> + Send + Sync + 'static
    {
        Matcher {
            inner: ArgMatcher::new::<T, P>(kind, description, pred),
            _t: PhantomData
        }
    }

    /// Match an argument exactly equal to `value`.
    pub fn literal(value: T) -> Self where T: PartialEq {
        let description = format!("{:?}", value);
        Self::new(MatcherKind::Literal, description, predicates::ord::eq(value))
    }

    pub fn matches(&self, value: &T) -> bool {
        self.inner.matches(value)
    }

    pub fn kind(&self) -> MatcherKind {
        self.inner.kind
    }

    pub fn into_inner(self) -> ArgMatcher {
        self.inner
    }
}

impl<T> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        Matcher { inner: self.inner.clone(), _t: PhantomData }
    }
}

impl<T> Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(&self.inner, f)
    }
}

impl<T> Display for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T: ArgValue + PartialEq> From<T> for Matcher<T> {
    fn from(value: T) -> Self {
        Matcher::literal(value)
    }
}

impl From<&str> for Matcher<String> {
    fn from(value: &str) -> Self {
        Matcher::literal(value.to_owned())
    }
}

impl<T> From<Matcher<T>> for ArgMatcher {
    fn from(m: Matcher<T>) -> Self {
        m.inner
    }
}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn literal_matches_equal_value() {
        let m = Matcher::from(5u32);
        assert_eq!(MatcherKind::Literal, m.kind());
        assert!(m.matches(&5));
        assert!(!m.matches(&6));
    }

    #[test]
    fn literal_rejects_other_types() {
        let m: ArgMatcher = Matcher::from(5u32).into();
        assert!(!m.matches(&5i32));
        let why = m.explain(&5i32).unwrap();
        assert!(why.contains("expected a value of type u32"), "{}", why);
    }

    #[test]
    fn str_literal_matches_string() {
        let m: Matcher<String> = "text".into();
        assert!(m.matches(&"text".to_owned()));
        assert_eq!("\"text\"", m.to_string());
    }

    #[test]
    fn explain_accepted_is_none() {
        let m: ArgMatcher = Matcher::from(5u32).into();
        assert_eq!(None, m.explain(&5u32));
    }

    #[test]
    fn explain_rejected_renders_case() {
        let m: ArgMatcher = Matcher::from(5u32).into();
        let why = m.explain(&6u32).unwrap();
        assert!(why.contains("var == 5"), "{}", why);
    }

    #[test]
    fn param_type() {
        let m: ArgMatcher = Matcher::from(String::from("x")).into();
        assert_eq!(ParamType::of::<String>(), m.param());
    }
}
