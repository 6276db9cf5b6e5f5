//! Logger capability used by the observer.

use crate::util::type_name_of;

/// Sink for the observer's human-readable reports.
///
/// Accepted failures are reported through [`warning`](Logger::warning),
/// declined and unhandled ones through [`error`](Logger::error).
pub trait Logger: Send + Sync {
    /// Name the logger reports under.
    fn name(&self) -> &str;

    /// Diagnostic note about the observer itself.
    fn debug(&self, text: &str);

    /// Report an expected, acknowledged failure.
    fn warning(&self, text: &str);

    /// Report a declined or unhandled failure.
    fn error(&self, text: &str);

    /// Short type name, used when the logger is the call's first argument.
    fn type_name(&self) -> &'static str {
        type_name_of::<Self>()
    }
}

/// Default logger: forwards to `tracing` events tagged with the logger name.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    /// Name used by the default registry.
    pub const DEFAULT_NAME: &'static str = "Observe";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl Logger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn debug(&self, text: &str) {
        tracing::debug!(logger = %self.name, "{text}");
    }

    fn warning(&self, text: &str) {
        tracing::warn!(logger = %self.name, "{text}");
    }

    fn error(&self, text: &str) {
        tracing::error!(logger = %self.name, "{text}");
    }
}
