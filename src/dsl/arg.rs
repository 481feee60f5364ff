use std::rc::Rc;

use crate::design::{DataType, Primitive, UserTypeRef};
use crate::eval::{ConfigFn, Eval};

/// The argument accepted by every construct following the builder pattern.
///
/// Exactly four shapes exist. Typed `From` conversions and the [`inline`]
/// helper form the call boundary, so most invalid shapes never compile;
/// [`ConstructArg::Invalid`] remains for callers that dispatch from dynamic
/// input and still want the construct-named diagnostic instead of a crash.
pub enum ConstructArg {
    /// Inline definition: a fresh object attribute shaped by the closure.
    Closure(ConfigFn),
    /// Reference to a previously defined named type.
    NamedRef(UserTypeRef),
    /// A structural or primitive type used as-is.
    Bare(DataType),
    /// An unsupported argument shape, described for the diagnostic.
    Invalid(&'static str),
}

impl ConstructArg {
    /// Wrap a configuration closure. Used for the inline-object form:
    /// `payload(e, inline(|e| { attribute(e, "left", Primitive::Int32); }))`.
    pub fn closure(f: impl FnOnce(&mut Eval) + 'static) -> Self {
        ConstructArg::Closure(Box::new(f))
    }
}

/// Shorthand for [`ConstructArg::closure`].
pub fn inline(f: impl FnOnce(&mut Eval) + 'static) -> ConstructArg {
    ConstructArg::closure(f)
}

impl From<DataType> for ConstructArg {
    fn from(ty: DataType) -> Self {
        ConstructArg::Bare(ty)
    }
}

impl From<Primitive> for ConstructArg {
    fn from(p: Primitive) -> Self {
        ConstructArg::Bare(DataType::Primitive(p))
    }
}

impl From<UserTypeRef> for ConstructArg {
    fn from(ut: UserTypeRef) -> Self {
        ConstructArg::NamedRef(ut)
    }
}

impl From<&UserTypeRef> for ConstructArg {
    fn from(ut: &UserTypeRef) -> Self {
        ConstructArg::NamedRef(Rc::clone(ut))
    }
}

/// By-name forward reference to a type that may not be defined yet; resolved
/// by the finalizer.
impl From<&str> for ConstructArg {
    fn from(name: &str) -> Self {
        ConstructArg::Bare(DataType::Ref(name.to_string()))
    }
}
