//! Logging and metrics collaborators.
//!
//! This module provides the observer's ambient sinks:
//! - Structured logging via the `tracing` crate, initialized from `LOG_LEVEL`
//! - The [`Logger`] and [`MetricSink`] capabilities located per call
//! - A DogStatsD client and an in-memory recorder implementing [`MetricSink`]
//!
//! # Feature Flags
//!
//! - `release-logs`: Strip debug/trace at compile time
//! - `max-perf`: Disable all tracing for maximum performance

mod init;
mod logger;
pub mod metrics;
pub mod statsd;

pub use init::{init_logging, parse_level, LoggingConfig, LoggingGuard, LOG_LEVEL_ENV};
pub use logger::{Logger, TracingLogger};
pub use metrics::{
    Emission, EmissionKind, Histogram, MemoryMetrics, MetricError, MetricSink, MetricsSnapshot,
    TimingMetrics,
};
pub use statsd::{StatsdClient, StatsdConfig};
