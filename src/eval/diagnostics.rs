use tracing::debug;

/// One collected usage error in a design description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Construct that reported the error (`Payload`, `Required`, ...), when
    /// the report came from a construct rather than the finalizer.
    pub construct: Option<String>,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.construct {
            Some(c) => write!(f, "{}: {}", c, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Batched collector of usage diagnostics.
///
/// Reports append and return; evaluation never unwinds on a usage error, so
/// one pass over a design surfaces every problem. Consumers check the batch
/// after evaluation and finalization, and code generation must not run while
/// it is non-empty.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Record a general usage error.
    pub fn report(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "design diagnostic");
        self.items.push(Diagnostic {
            construct: None,
            message,
        });
    }

    /// Record an error attributed to a specific construct, keeping error
    /// messages construct-specific even though the builder is generic.
    pub fn report_for(&mut self, construct: &str, message: impl Into<String>) {
        let message = message.into();
        debug!(construct, %message, "design diagnostic");
        self.items.push(Diagnostic {
            construct: Some(construct.to_string()),
            message,
        });
    }

    /// The "wrong place" diagnostic: a construct was invoked while the
    /// current expression does not support it. The caller must treat the
    /// construct as a no-op after reporting.
    pub fn incompatible(&mut self, construct: &str, found: Option<&str>) {
        let message = match found {
            Some(kind) => format!("invalid use of {} in {} expression", construct, kind),
            None => format!("invalid use of {} outside any expression", construct),
        };
        debug!(construct, %message, "incompatible construct");
        self.items.push(Diagnostic {
            construct: Some(construct.to_string()),
            message,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Surface the whole batch, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }
}
