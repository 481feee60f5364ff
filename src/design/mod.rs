//! # Expression Model
//!
//! Plain data structures describing an API design: attributes, data types,
//! named user types, methods and services. No behavior beyond structural
//! queries and deep duplication lives here; construction is driven by the
//! [`crate::dsl`] constructs through the [`crate::eval`] context, and
//! deferred cross-references are resolved by [`crate::eval::finalize`].
//!
//! Ownership model: the tree is built from `Rc<RefCell<_>>` handles
//! ([`AttributeRef`], [`UserTypeRef`], [`ServiceRef`], [`MethodRef`]) because
//! configuration closures mutate the expression they are currently
//! configuring while the tree keeps its links. Evaluation is strictly
//! single-threaded; the handles are deliberately `!Send`.

mod attribute;
mod expr;
mod types;

pub use attribute::{AttributeExpr, Validation};
pub use expr::{ErrorExpr, MethodExpr, MethodRef, RootExpr, ServiceExpr, ServiceRef};
pub use types::{
    primitive_attr, AttributeRef, DataType, NamedAttribute, Object, Primitive, UserTypeExpr,
    UserTypeRef,
};
