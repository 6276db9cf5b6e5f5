//! Logging initialization.
//!
//! Installs the process-wide `tracing` subscriber that the default
//! [`TracingLogger`](super::TracingLogger) writes through. Output goes to
//! stdout at the level named by `LOG_LEVEL` (default `info`).

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Configuration for logging initialization.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level
    pub default_level: Level,
    /// Whether to include file and line numbers
    pub include_file_line: bool,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
    /// Whether to use compact format
    pub compact: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            include_file_line: false,
            include_target: true,
            ansi_colors: true,
            compact: true,
        }
    }
}

impl LoggingConfig {
    /// Read the level from `LOG_LEVEL`, falling back to `info`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_level = lookup(LOG_LEVEL_ENV)
            .as_deref()
            .and_then(parse_level)
            .unwrap_or(Level::INFO);

        Self {
            default_level,
            ..Self::default()
        }
    }
}

/// Parse a log level name.
///
/// Accepts the `tracing` names plus the `warning`, `critical` and `fatal`
/// spellings common in other logging stacks.
pub fn parse_level(value: &str) -> Option<Level> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("warning") {
        return Some(Level::WARN);
    }
    if value.eq_ignore_ascii_case("critical") || value.eq_ignore_ascii_case("fatal") {
        return Some(Level::ERROR);
    }
    Level::from_str(value).ok()
}

/// Guard that keeps the logging subscriber active.
pub struct LoggingGuard {
    #[allow(dead_code)]
    _private: (),
}

/// Install the global subscriber for the given configuration.
///
/// Fails if a global subscriber is already set.
///
/// # Example
///
/// ```rust,ignore
/// use observe::telemetry::{init_logging, LoggingConfig};
///
/// fn main() -> anyhow::Result<()> {
///     let _guard = init_logging(&LoggingConfig::from_env())?;
///     Ok(())
/// }
/// ```
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let filter = EnvFilter::default().add_directive(config.default_level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line);

    let fmt_layer = if config.compact {
        fmt_layer.compact().boxed()
    } else {
        fmt_layer.boxed()
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(LoggingGuard { _private: () })
}
