// vim: tw=80
//! Configured behaviors and their counters.

use std::{
    any::Any,
    fmt::{self, Debug, Display},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering}
    }
};

use crate::{
    arguments::Arguments,
    matcher::ArgMatcher,
    signature::OperationSignature
};

/// Opaque identity of a [`CallRecord`], unique within its interceptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub(crate) u64);

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type ValueFn = dyn Fn() -> Box<dyn Any> + Send + Sync;
type ErrorFn = dyn Fn() -> Box<dyn Any + Send> + Send + Sync;

/// What a configured call does.
///
/// The closures run once per live call, so each call gets a fresh value.
#[derive(Clone, Default)]
pub enum Outcome {
    Return(Arc<ValueFn>),
    Throw(Arc<ErrorFn>),
    /// Return the zero value of the operation's return type.
    #[default]
    Unconfigured
}

impl Outcome {
    pub fn returning<F>(f: F) -> Self
        where F: Fn() -> Box<dyn Any> + Send + Sync + 'static
    {
        Outcome::Return(Arc::new(f))
    }

    pub fn throwing<F>(f: F) -> Self
        where F: Fn() -> Box<dyn Any + Send> + Send + Sync + 'static
    {
        Outcome::Throw(Arc::new(f))
    }

    /// Produce the reply for one live call.
    pub fn reply(&self) -> Reply {
        match self {
            Outcome::Return(f) => Reply::Return(f()),
            Outcome::Throw(f) => Reply::Throw(f()),
            Outcome::Unconfigured => Reply::Default
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, Outcome::Unconfigured)
    }
}

impl Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Return(_) => f.write_str("Return(..)"),
            Outcome::Throw(_) => f.write_str("Throw(..)"),
            Outcome::Unconfigured => f.write_str("Unconfigured"),
        }
    }
}

/// What the proxy should do with one live call.
pub enum Reply {
    Return(Box<dyn Any>),
    /// Raise this exact error object.
    Throw(Box<dyn Any + Send>),
    /// Return the zero value of the declared return type.
    Default
}

impl Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Reply::Return(_) => f.write_str("Return(..)"),
            Reply::Throw(_) => f.write_str("Throw(..)"),
            Reply::Default => f.write_str("Default"),
        }
    }
}

/// One configured behavior of a mocked operation, or the implicit record that
/// counts calls no setup accepted.
///
/// Owned by the [`Interceptor`](crate::Interceptor) that created it.  Only its
/// invocation counter ever changes.
pub struct CallRecord {
    id: RecordId,
    signature: OperationSignature,
    matchers: Vec<ArgMatcher>,
    outcome: Outcome,
    replaces: Option<RecordId>,
    invocations: AtomicUsize
}

impl CallRecord {
    pub(crate) fn new(id: RecordId, signature: OperationSignature,
                      matchers: Vec<ArgMatcher>, outcome: Outcome) -> Self
    {
        CallRecord {
            id,
            signature,
            matchers,
            outcome,
            replaces: None,
            invocations: AtomicUsize::new(0)
        }
    }

    pub(crate) fn replacing(mut self, replaces: Option<RecordId>) -> Self {
        self.replaces = replaces;
        self
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn signature(&self) -> &OperationSignature {
        &self.signature
    }

    pub fn matchers(&self) -> &[ArgMatcher] {
        &self.matchers
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// The record of the same setup that this one superseded, when it was
    /// made by configuring an outcome on an existing setup.
    pub fn replaces(&self) -> Option<RecordId> {
        self.replaces
    }

    /// Does every matcher accept its positional argument?
    ///
    /// Matchers are evaluated left to right and stop at the first rejection.
    pub fn matches(&self, args: &Arguments) -> bool {
        self.matchers.len() == args.len() &&
            self.matchers.iter()
                .zip(args.iter())
                .all(|(m, a)| m.matches(a))
    }

    /// Explain the first argument this record rejects, if any.
    pub fn explain(&self, args: &Arguments) -> Option<String> {
        if self.matchers.len() != args.len() {
            return Some(format!("expected {} arguments, got {}",
                                self.matchers.len(), args.len()));
        }
        self.matchers.iter()
            .zip(args.iter())
            .enumerate()
            .find_map(|(i, (m, a))| {
                m.explain(a).map(|why| format!("argument #{}: {}", i, why))
            })
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::Relaxed)
    }

    pub(crate) fn record_invocation(&self) -> usize {
        self.invocations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The call this record accepts, as text: `name(matcher, ...)`
    pub fn expression(&self) -> String {
        expression(self.signature.name(), &self.matchers)
    }
}

impl Debug for CallRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CallRecord")
            .field("id", &self.id)
            .field("signature", &self.signature)
            .field("matchers", &self.matchers)
            .field("outcome", &self.outcome)
            .field("replaces", &self.replaces)
            .field("invocations", &self.invocation_count())
            .finish()
    }
}

pub(crate) fn expression(name: &str, matchers: &[ArgMatcher]) -> String {
    let args = matchers.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}({})", name, args)
}

#[cfg(test)]
mod t {
    use super::*;
    use crate::{it, matcher::Matcher};

    fn record(matchers: Vec<ArgMatcher>) -> CallRecord {
        let sig = OperationSignature::named("foo").param::<u32>().param::<u32>();
        CallRecord::new(RecordId(0), sig, matchers, Outcome::Unconfigured)
    }

    #[test]
    fn matches_all_arguments() {
        let r = record(vec![Matcher::from(1u32).into(), it::any::<u32>().into()]);
        assert!(r.matches(&Arguments::new().with(1u32).with(7u32)));
        assert!(!r.matches(&Arguments::new().with(2u32).with(7u32)));
    }

    #[test]
    fn short_circuits() {
        let r = record(vec![
            Matcher::from(1u32).into(),
            it::is(|_: &u32| -> bool { panic!("should not be evaluated") })
                .into()
        ]);
        assert!(!r.matches(&Arguments::new().with(2u32).with(7u32)));
    }

    #[test]
    fn arity_mismatch_never_matches() {
        let r = record(vec![it::any::<u32>().into(), it::any::<u32>().into()]);
        assert!(!r.matches(&Arguments::new().with(1u32)));
        assert!(r.explain(&Arguments::new().with(1u32)).is_some());
    }

    #[test]
    fn explain_names_first_rejection() {
        let r = record(vec![it::any::<u32>().into(), Matcher::from(3u32).into()]);
        let why = r.explain(&Arguments::new().with(1u32).with(4u32)).unwrap();
        assert!(why.starts_with("argument #1:"), "{}", why);
    }

    #[test]
    fn counts() {
        let r = record(vec![]);
        assert_eq!(0, r.invocation_count());
        assert_eq!(1, r.record_invocation());
        assert_eq!(2, r.record_invocation());
        assert_eq!(2, r.invocation_count());
    }

    #[test]
    fn expression_text() {
        let r = record(vec![Matcher::from(1u32).into(), it::any::<u32>().into()]);
        assert_eq!("foo(1, it::any())", r.expression());
    }

    #[test]
    fn outcome_replies_fresh_values() {
        let o = Outcome::returning(|| Box::new(vec![1u8]));
        for _ in 0..2 {
            match o.reply() {
                Reply::Return(v) =>
                    assert_eq!(Some(&vec![1u8]), v.downcast_ref::<Vec<u8>>()),
                r => panic!("unexpected {:?}", r)
            }
        }
    }
}
