// vim: tw=80
//! Argument matcher constructors.
//!
//! Pass these wherever a setup or verification helper accepts an
//! `impl Into<Matcher<T>>`.  A plain value works too, and matches by
//! equality.
//!
//! # Examples
//! ```
//! # use easymock::*;
//! let any = it::any::<u32>();
//! let small = it::in_range(1u32, 5, RangeKind::Inclusive).unwrap();
//! let odd = it::is(|x: &u32| x % 2 == 1);
//! assert!(any.matches(&99));
//! assert!(small.matches(&5));
//! assert!(!odd.matches(&4));
//! ```

use predicates::prelude::*;
use std::{
    any::Any,
    cmp::Ordering,
    fmt::Debug
};

use crate::{
    arguments::ArgValue,
    error::{MockError, Result},
    matcher::{Matcher, MatcherKind, RangeKind}
};

/// Match any value of type `T`.
pub fn any<T: ArgValue>() -> Matcher<T> {
    Matcher::new(MatcherKind::Any, "it::any()".to_owned(),
                 predicate::always())
}

/// Match any `Some` value.
pub fn not_null<T: ArgValue>() -> Matcher<Option<T>> {
    let p = predicate::function(|v: &Option<T>| v.is_some())
        .fn_name("is_some");
    Matcher::new(MatcherKind::NotNull, "it::not_null()".to_owned(), p)
}

/// Match any value for which `f` returns true.
///
/// `f` must not panic; if it does, the panic propagates out of the call being
/// resolved.
pub fn is<T, F>(f: F) -> Matcher<T>
    where T: ArgValue, F: Fn(&T) -> bool + Send + Sync + 'static
{
    let p = predicate::function(f).fn_name("it::is");
    Matcher::new(MatcherKind::Predicate, "it::is(<closure>)".to_owned(), p)
}

/// Match any value accepted by an arbitrary [`Predicate`].
///
/// This is how to compose matchers.
///
/// # Examples
/// ```
/// # use easymock::*;
/// use easymock::predicate::*;
/// let m = it::matching(ge(10u32).and(lt(20u32)).or(eq(99u32)));
/// assert!(m.matches(&15));
/// assert!(m.matches(&99));
/// assert!(!m.matches(&20));
/// ```
pub fn matching<T, P>(pred: P) -> Matcher<T>
    where T: ArgValue, P: Predicate<T> + Send + Sync + 'static
{
    let description = format!("it::matching({})", pred);
    Matcher::new(MatcherKind::Predicate, description, pred)
}

/// For integer and `char` bounds, does the open interval `(from, to)` hold no
/// value at all?  `None` for other types, which have no notion of a
/// successor.
fn open_interval_empty<T: Any>(from: &T, to: &T) -> Option<bool> {
    let (from, to) = (from as &dyn Any, to as &dyn Any);
    macro_rules! stepped {
        ($($t:ty),*) => {
            $(
                if let (Some(f), Some(t)) =
                    (from.downcast_ref::<$t>(), to.downcast_ref::<$t>())
                {
                    // nth steps with checked arithmetic
                    return Some((*f..*t).nth(1).is_none());
                }
            )*
        }
    }
    stepped!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
             char);
    None
}

/// Match values between `from` and `to`.
///
/// Any ordered type works.  Bounds that are inverted or can't be compared
/// are an error.  So is an exclusive range that admits no value: for integers
/// and `char` that means `to - from <= 1`, for other types `from == to`.
pub fn in_range<T>(from: T, to: T, kind: RangeKind) -> Result<Matcher<T>>
    where T: ArgValue + PartialOrd
{
    let reason = match from.partial_cmp(&to) {
        None => Some(format!("{:?} and {:?} can't be compared", from, to)),
        Some(Ordering::Greater) =>
            Some(format!("{:?} is greater than {:?}", from, to)),
        _ => None
    };
    if let Some(reason) = reason {
        return Err(MockError::InvalidRange{reason});
    }
    let description = format!("it::in_range({:?}, {:?}, {})", from, to, kind);
    match kind {
        RangeKind::Inclusive => {
            let p = predicate::ge(from).and(predicate::le(to));
            Ok(Matcher::new(MatcherKind::Range(kind), description, p))
        },
        RangeKind::Exclusive => {
            if open_interval_empty(&from, &to).unwrap_or(from == to) {
                return Err(MockError::InvalidRange {
                    reason: format!(
                        "no value lies strictly between {:?} and {:?}",
                        from, to)
                });
            }
            let p = predicate::gt(from).and(predicate::lt(to));
            Ok(Matcher::new(MatcherKind::Range(kind), description, p))
        }
    }
}

/// Match any of `items`.
pub fn one_of<T, I>(items: I) -> Matcher<T>
    where T: ArgValue + PartialEq, I: IntoIterator<Item=T>
{
    let items: Vec<T> = items.into_iter().collect();
    let description = format!("it::one_of({:?})", items);
    Matcher::new(MatcherKind::OneOf, description, predicate::in_iter(items))
}

/// Match anything except `items`.
pub fn none_of<T, I>(items: I) -> Matcher<T>
    where T: ArgValue + PartialEq, I: IntoIterator<Item=T>
{
    let items: Vec<T> = items.into_iter().collect();
    let description = format!("it::none_of({:?})", items);
    Matcher::new(MatcherKind::NoneOf, description,
                 predicate::in_iter(items).not())
}

/// Match exactly `value`.  Equivalent to `Matcher::from(value)`.
pub fn eq<T: ArgValue + PartialEq + Debug>(value: T) -> Matcher<T> {
    Matcher::literal(value)
}

#[cfg(test)]
mod t {
    use super::*;

    mod in_range {
        use super::*;

        #[test]
        fn inclusive_contains_endpoints() {
            let m = in_range(2i32, 5, RangeKind::Inclusive).unwrap();
            assert!(!m.matches(&1));
            assert!(m.matches(&2));
            assert!(m.matches(&5));
            assert!(!m.matches(&6));
        }

        #[test]
        fn exclusive_omits_endpoints() {
            let m = in_range(2i32, 5, RangeKind::Exclusive).unwrap();
            assert!(!m.matches(&2));
            assert!(m.matches(&3));
            assert!(m.matches(&4));
            assert!(!m.matches(&5));
        }

        #[test]
        fn exclusive_too_narrow() {
            let e = in_range(2u32, 3, RangeKind::Exclusive).unwrap_err();
            assert!(e.is_configuration_error());
            let e = in_range(2u32, 2, RangeKind::Exclusive).unwrap_err();
            assert!(e.is_configuration_error());
        }

        #[test]
        fn inclusive_single_value() {
            let m = in_range(3u8, 3, RangeKind::Inclusive).unwrap();
            assert!(m.matches(&3));
        }

        #[test]
        fn inverted() {
            let e = in_range(5i64, 1, RangeKind::Inclusive).unwrap_err();
            assert!(matches!(e, MockError::InvalidRange{..}));
        }

        #[test]
        fn full_width_exclusive() {
            let m = in_range(i32::MIN, i32::MAX, RangeKind::Exclusive)
                .unwrap();
            assert!(m.matches(&0));
            assert!(!m.matches(&i32::MIN));
            assert!(!m.matches(&i32::MAX));
            assert!(in_range(-30000i16, 30000, RangeKind::Exclusive).is_ok());
            assert!(in_range(u64::MAX - 1, u64::MAX, RangeKind::Exclusive)
                .is_err());
        }

        #[test]
        fn small_integers() {
            let m = in_range(-3i8, 3, RangeKind::Inclusive).unwrap();
            assert!(m.matches(&-3));
            assert!(!m.matches(&4));
            assert!(in_range(i8::MIN, i8::MIN + 1, RangeKind::Exclusive)
                .is_err());
        }

        #[test]
        fn chars() {
            let m = in_range('a', 'c', RangeKind::Exclusive).unwrap();
            assert!(m.matches(&'b'));
            assert!(!m.matches(&'c'));
            let e = in_range('a', 'b', RangeKind::Exclusive).unwrap_err();
            assert!(e.is_configuration_error());
        }

        #[test]
        fn strings() {
            let m = in_range("apple".to_owned(), "banana".to_owned(),
                             RangeKind::Exclusive).unwrap();
            assert!(m.matches(&"avocado".to_owned()));
            assert!(!m.matches(&"cherry".to_owned()));
            assert!(in_range("a".to_owned(), "a".to_owned(),
                             RangeKind::Exclusive).is_err());
            assert!(in_range("a".to_owned(), "a".to_owned(),
                             RangeKind::Inclusive).is_ok());
        }

        #[test]
        fn floats() {
            let m = in_range(1.0f64, 2.0, RangeKind::Exclusive).unwrap();
            assert!(m.matches(&1.5));
            assert!(in_range(f64::NAN, 2.0, RangeKind::Inclusive).is_err());
        }

        #[test]
        fn description() {
            let m = in_range(1u32, 9, RangeKind::Exclusive).unwrap();
            assert_eq!("it::in_range(1, 9, Exclusive)", m.to_string());
        }
    }

    #[test]
    fn not_null() {
        let m = super::not_null::<u32>();
        assert!(m.matches(&Some(0)));
        assert!(!m.matches(&None));
    }

    #[test]
    fn one_of_and_none_of() {
        let one = one_of([1u32, 3, 5]);
        let none = none_of(vec![1u32, 3, 5]);
        for x in 0..7u32 {
            assert_eq!(x % 2 == 1 && x < 6, one.matches(&x));
            assert_ne!(one.matches(&x), none.matches(&x));
        }
    }

    #[test]
    fn any_matches_everything() {
        let m = any::<String>();
        assert!(m.matches(&String::new()));
        assert_eq!(MatcherKind::Any, m.kind());
    }

    #[test]
    #[should_panic(expected = "predicate exploded")]
    fn predicate_panics_propagate() {
        let m = is(|_: &u32| -> bool { panic!("predicate exploded") });
        m.matches(&1);
    }
}
