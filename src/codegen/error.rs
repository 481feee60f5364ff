use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the generation pipeline.
///
/// `Internal` is the fatal kind: it signals a broken invariant in the
/// generator itself (a finalized, internally-consistent document failing to
/// serialize) and aborts the whole run. `Render` and `Io` stay local to the
/// file that raised them; the driver records them and keeps generating
/// sibling files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("internal invariant violated: {0}")]
    Internal(String),

    #[error("unknown template \"{0}\"")]
    UnknownTemplate(String),

    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),

    #[error("io failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }
}
