//! # DSL Constructs
//!
//! The configuration functions a design author calls inside nested closures,
//! all following one builder contract:
//!
//! 1. the argument is a type, a named type reference, or an inline closure
//!    ([`ConstructArg`] is the four-variant boundary);
//! 2. an optional refining closure customizes the constructed attribute at
//!    this use site only — named types are deep-copied before refinement,
//!    and shared untouched without it;
//! 3. misuse (wrong arity, wrong argument shape, wrong enclosing context)
//!    is reported to the batched diagnostics and the construct becomes a
//!    no-op, never a crash.
//!
//! Each construct is valid only while a specific kind of expression is
//! current: [`method`] inside a service closure, [`payload`]/[`result`]/
//! [`error`] inside a method closure, [`attribute`]/[`required`] inside an
//! object attribute closure. [`Design`] is the entry point that owns the
//! evaluation context.

mod arg;
mod builder;
mod constructs;
mod design;

pub use arg::{inline, ConstructArg};
pub use builder::construct;
pub use constructs::{
    array_of, attribute, attribute_fns, attribute_with, description, empty_object, error, map_of,
    max_length, maximum, method, min_length, minimum, payload, payload_fns, payload_with, pattern,
    required, result, result_fns, result_with,
};
pub use design::Design;
