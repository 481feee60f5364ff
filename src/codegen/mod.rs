//! # Code Generation
//!
//! The section pipeline that turns a finalized expression tree into ordered,
//! template-bound output artifacts.
//!
//! ## Architecture
//!
//! ```text
//! Finalized tree → File implementations → Sections → Template Rendering → Artifacts
//! ```
//!
//! - A [`File`] names an output artifact and produces, on demand, an ordered
//!   list of [`Section`]s for a given generation parameter (the consumer's
//!   import root).
//! - A [`Section`] pairs a template identifier with the data it binds; the
//!   templates live in one [`minijinja`] environment and the section order
//!   within a file is a contract — later sections may reference declarations
//!   emitted by earlier ones.
//! - The [`Generator`] driver renders each file's sections into a single
//!   byte stream, writes it under the output root, and runs the file's
//!   finalize hook. One file failing does not abort its siblings; only the
//!   fatal [`Error::Internal`] kind aborts the batch.
//!
//! Determinism: an identical finalized tree and generation parameter produce
//! byte-identical output — no timestamps, no unsorted map traversal.

pub mod error;
mod file;
pub mod http;
mod naming;
mod templates;
mod writer;

pub use error::Error;
pub use file::{header_section, File, ImportSpec, Section, SourceFile};
pub use naming::{sanitize_ident, to_camel_case, to_snake_case};
pub use templates::environment;
pub use writer::{GenReport, Generator};
