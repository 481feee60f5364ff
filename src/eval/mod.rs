//! # Evaluation
//!
//! The machinery that turns nested configuration closures into a validated
//! expression tree:
//!
//! - [`Eval`] — the explicit evaluation context: a LIFO stack of the
//!   expressions currently under configuration, threaded as a parameter
//!   through every construct rather than held in ambient global state.
//! - [`Diagnostics`] — batched usage errors. Evaluation never stops at the
//!   first mistake; the whole batch is surfaced once the tree is built.
//! - [`finalize`] — the second pass resolving deferred cross-references
//!   (required-field lists, forward type references) once the full tree
//!   exists.
//!
//! Evaluation is strictly single-threaded and synchronous: the stack
//! discipline relies on closures running to completion before control
//! returns to their invoker.

mod context;
mod diagnostics;
mod finalize;

pub use context::{ConfigFn, Eval, ExprHandle};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use finalize::finalize;
