//! # apiforge
//!
//! **apiforge** is a design-first service generator: a caller builds a
//! declarative description of an API — services, methods, payload and result
//! shapes — by invoking nested configuration closures; the crate evaluates
//! that description into a validated expression tree and drives
//! code-generation templates that emit transport-layer sources and a
//! machine-readable API specification.
//!
//! ## Architecture
//!
//! The library is organized into four key modules:
//!
//! - **[`design`]** - the expression model: attributes, data types, named
//!   user types, methods and services
//! - **[`eval`]** - the evaluation context stack, the batched diagnostics
//!   collector, and the finalizer resolving deferred cross-references
//! - **[`dsl`]** - the configuration constructs a design author calls, all
//!   following one generic builder contract
//! - **[`codegen`]** - the Section/File model, the template environment, and
//!   the generation driver; [`codegen::http`] holds the concrete client
//!   transport and OpenAPI document artifacts
//!
//! ## Flow
//!
//! ```text
//! author closures → dsl constructs + eval context → expression tree
//!     → finalizer → finalized tree → File implementations
//!     → Sections → rendered artifacts
//! ```
//!
//! Evaluation is single-threaded and synchronous; usage errors are batched
//! diagnostics, never panics, so one pass surfaces every problem in a
//! design. Generation is deterministic: the same finalized tree and the
//! same generation parameter produce byte-identical artifacts.
//!
//! ## Example
//!
//! ```no_run
//! use apiforge::design::Primitive;
//! use apiforge::dsl::{attribute, method, payload_with, required, result, Design};
//! use apiforge::codegen::http::{client_files, OpenApiFile};
//! use apiforge::codegen::{File, Generator};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut design = Design::new("calc");
//! let operands = design.user_type("Operands", |e| {
//!     attribute(e, "left", Primitive::Int32);
//!     attribute(e, "right", Primitive::Int32);
//! });
//! design.service("calculator", move |e| {
//!     method(e, "add", move |e| {
//!         payload_with(e, &operands, |e| required(e, &["left", "right"]));
//!         result(e, Primitive::Int64);
//!     });
//! });
//!
//! let root = design.finalize().map_err(|batch| {
//!     anyhow::anyhow!("design has {} error(s)", batch.len())
//! })?;
//! let mut files = client_files(&root);
//! files.push(Box::new(OpenApiFile::new(&root)?) as Box<dyn File>);
//! Generator::new("generated")?.write_all(&files, "my_app")?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod codegen;
pub mod demo;
pub mod design;
pub mod dsl;
pub mod eval;
