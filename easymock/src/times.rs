// vim: tw=80
//! Quantitative expectations over invocation counts.

use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher}
};

use crate::{
    error::{MockError, Result},
    matcher::RangeKind
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    AtLeast,
    AtMost,
    Between(RangeKind),
    Exactly,
    Never,
    Once,
    AtLeastOnce,
    AtMostOnce
}

/// How many times an operation is expected to have been called.
///
/// A `Times` is a pure value: two bounds plus the template used to explain a
/// failed verification.  Equality compares only the bounds, so
/// `Times::once() == Times::exactly(1)`.  Unbounded expectations store
/// `usize::MAX` as their upper bound.
///
/// # Examples
/// ```
/// # use easymock::*;
/// let t = Times::between(2, 5, RangeKind::Inclusive).unwrap();
/// assert!(!t.evaluate(1));
/// assert!(t.evaluate(2));
/// assert!(t.evaluate(5));
/// assert!(Times::between(2, 3, RangeKind::Exclusive).is_err());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Times {
    kind: Kind,
    from: usize,
    to: usize,
    template: &'static str
}

impl Times {
    fn new(kind: Kind, from: usize, to: usize, template: &'static str) -> Self
    {
        Times{kind, from, to, template}
    }

    /// At least `n` calls.  `n` must be at least 1.
    pub fn at_least(n: usize) -> Result<Self> {
        if n < 1 {
            return Err(MockError::InvalidArgument {
                name: "n",
                reason: "must be at least 1; use Times::at_most or \
                    Times::never for zero".to_owned()
            });
        }
        Ok(Times::new(Kind::AtLeast, n, usize::MAX,
            "{context}: Expected invocation on the mock at least {from} \
            times, but was {count} times: {expression}"))
    }

    pub fn at_least_once() -> Self {
        Times::new(Kind::AtLeastOnce, 1, usize::MAX,
            "{context}: Expected invocation on the mock at least once, but \
            was never performed: {expression}")
    }

    pub fn at_most(n: usize) -> Self {
        Times::new(Kind::AtMost, 0, n,
            "{context}: Expected invocation on the mock at most {to} times, \
            but was {count} times: {expression}")
    }

    pub fn at_most_once() -> Self {
        Times::new(Kind::AtMostOnce, 0, 1,
            "{context}: Expected invocation on the mock at most once, but was \
            {count} times: {expression}")
    }

    /// Between `from` and `to` calls.
    ///
    /// `from` may not exceed `to`, and an exclusive range must leave at least
    /// one count strictly between its bounds.
    pub fn between(from: usize, to: usize, kind: RangeKind) -> Result<Self> {
        if from > to {
            return Err(MockError::InvalidArgument {
                name: "from",
                reason: format!("{} is greater than the upper bound {}",
                                from, to)
            });
        }
        match kind {
            RangeKind::Inclusive => {
                Ok(Times::new(Kind::Between(kind), from, to,
                    "{context}: Expected invocation on the mock between \
                    {from} and {to} times (Inclusive), but was {count} times: \
                    {expression}"))
            },
            RangeKind::Exclusive => {
                if to - from <= 1 {
                    return Err(MockError::InvalidArgument {
                        name: "to",
                        reason: format!("no call count lies strictly between \
                                        {} and {}", from, to)
                    });
                }
                Ok(Times::new(Kind::Between(kind), from, to,
                    "{context}: Expected invocation on the mock between \
                    {from} and {to} times (Exclusive), but was {count} times: \
                    {expression}"))
            }
        }
    }

    pub fn exactly(n: usize) -> Self {
        Times::new(Kind::Exactly, n, n,
            "{context}: Expected invocation on the mock exactly {from} times, \
            but was {count} times: {expression}")
    }

    pub fn never() -> Self {
        Times::new(Kind::Never, 0, 0,
            "{context}: Expected invocation on the mock should never have been \
            performed, but was {count} times: {expression}")
    }

    pub fn once() -> Self {
        Times::new(Kind::Once, 1, 1,
            "{context}: Expected invocation on the mock once, but was {count} \
            times: {expression}")
    }

    /// Does `count` satisfy this expectation?
    pub fn evaluate(&self, count: usize) -> bool {
        match self.kind {
            Kind::AtLeast | Kind::AtLeastOnce => count >= self.from,
            Kind::AtMost | Kind::AtMostOnce => count <= self.to,
            Kind::Between(RangeKind::Inclusive) =>
                self.from <= count && count <= self.to,
            Kind::Between(RangeKind::Exclusive) =>
                self.from < count && count < self.to,
            Kind::Exactly | Kind::Never | Kind::Once => count == self.from,
        }
    }

    pub fn lower_bound(&self) -> usize {
        self.from
    }

    pub fn upper_bound(&self) -> usize {
        self.to
    }

    /// Render the failure template for an operation described by
    /// `expression` that was called `count` times.
    pub fn failure_message(&self, context: &str, expression: &str,
                           count: usize) -> String
    {
        self.template
            .replace("{context}", context)
            .replace("{from}", &self.from.to_string())
            .replace("{to}", &self.to.to_string())
            .replace("{count}", &count.to_string())
            .replace("{expression}", expression)
    }
}

impl PartialEq for Times {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Times {}

impl Hash for Times {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl Display for Times {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            Kind::AtLeast => write!(f, "at least {} times", self.from),
            Kind::AtLeastOnce => f.write_str("at least once"),
            Kind::AtMost => write!(f, "at most {} times", self.to),
            Kind::AtMostOnce => f.write_str("at most once"),
            Kind::Between(k) => write!(f, "between {} and {} times ({})",
                                       self.from, self.to, k),
            Kind::Exactly => write!(f, "exactly {} times", self.from),
            Kind::Never => f.write_str("never"),
            Kind::Once => f.write_str("once"),
        }
    }
}
