// vim: tw=80
//! Identity of a mocked operation.

use std::{
    any::{self, TypeId},
    borrow::Cow,
    fmt::{self, Display},
    hash::{Hash, Hasher}
};

/// The type of one parameter of a mocked operation.
///
/// Two `ParamType`s are equal iff they describe the same Rust type.  The name
/// is carried only for messages.
#[derive(Clone, Copy, Debug)]
pub struct ParamType {
    id: TypeId,
    name: &'static str
}

impl ParamType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        ParamType {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>()
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ParamType {}

impl Hash for ParamType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Name plus ordered parameter types of a mocked operation.
///
/// The proxy and the configuration side must build the signature the same
/// way, or live calls will silently fail to match their setups.
///
/// # Examples
/// ```
/// # use easymock::*;
/// let a = OperationSignature::new("method_with_value_parameter",
///                                 [ParamType::of::<i32>()]);
/// let b = OperationSignature::named("method_with_value_parameter")
///     .param::<i32>();
/// assert_eq!(a, b);
/// assert_eq!("method_with_value_parameter(i32)", a.to_string());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperationSignature {
    name: Cow<'static, str>,
    params: Vec<ParamType>
}

impl OperationSignature {
    pub fn new<N, I>(name: N, params: I) -> Self
        where N: Into<Cow<'static, str>>,
              I: IntoIterator<Item=ParamType>
    {
        OperationSignature {
            name: name.into(),
            params: params.into_iter().collect()
        }
    }

    /// A signature for an operation with no parameters.  Add some with
    /// [`param`](#method.param).
    pub fn named<N: Into<Cow<'static, str>>>(name: N) -> Self {
        Self::new(name, [])
    }

    /// Append a parameter of type `T`.
    pub fn param<T: ?Sized + 'static>(mut self) -> Self {
        self.params.push(ParamType::of::<T>());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Display for OperationSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str(")")
    }
}
