//! HTTP transport artifacts: the per-service client files and the top-level
//! OpenAPI document. These consume the finalized tree and the Section/File
//! model; all novel logic lives upstream of them.

mod client;
mod openapi;

pub use client::{client_files, rust_type, transport_path};
pub use openapi::{build_document, OpenApiFile};
