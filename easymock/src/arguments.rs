// vim: tw=80
//! Type-erased argument values of a live call.

use downcast::{downcast, Any};
use std::fmt::{self, Debug, Display};

/// A value that can be passed as an argument to a mocked operation.
///
/// Implemented for every `'static` type that is `Debug + Send + Sync`.  The
/// interceptor keeps every argument it sees so that verification can match
/// against the full call history.
pub trait ArgValue: Any + Debug + Send + Sync {}

impl<T: Any + Debug + Send + Sync> ArgValue for T {}

downcast!(dyn ArgValue);

/// The ordered, owned arguments of one live call.
///
/// # Examples
/// ```
/// # use easymock::*;
/// let args = Arguments::new().with(42u32).with(String::from("text"));
/// assert_eq!(2, args.len());
/// assert_eq!(Some(&42u32), args.get::<u32>(0));
/// assert_eq!("42, \"text\"", args.to_string());
/// ```
#[derive(Debug, Default)]
pub struct Arguments(Vec<Box<dyn ArgValue>>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next positional argument.
    pub fn with<T: ArgValue>(mut self, value: T) -> Self {
        self.0.push(Box::new(value));
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `i`th argument, if it exists and has type `T`.
    pub fn get<T: ArgValue>(&self, i: usize) -> Option<&T> {
        self.0.get(i).and_then(|v| v.downcast_ref::<T>().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item=&dyn ArgValue> {
        self.0.iter().map(|b| b.as_ref())
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", v)?;
        }
        Ok(())
    }
}
