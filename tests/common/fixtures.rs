//! Errors, payloads and a pre-wired registry for observer tests.

use std::sync::Arc;

use observe::{Defaults, Fault, Kwargs, MemoryMetrics};
use serde_json::{json, Value};
use thiserror::Error;

use super::recorders::{RecordingLogger, RecordingNotifier};

/// If raised, the work should be acknowledged.
#[derive(Debug, Error)]
#[error("... acknowledge me ...")]
pub struct AcceptOnError;
impl Fault for AcceptOnError {}

/// If raised, the work should not be acknowledged.
#[derive(Debug, Error)]
#[error("... don't acknowledge me ...")]
pub struct DeclineOnError;
impl Fault for DeclineOnError {}

/// If raised, the work should not be acknowledged and someone gets notified.
#[derive(Debug, Error)]
#[error("... uhuh don't acknowledge me ...")]
pub struct CustomError;
impl Fault for CustomError {}

/// One error type covering all three, for callables that can fail each way.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Accept(#[from] AcceptOnError),
    #[error(transparent)]
    Decline(#[from] DeclineOnError),
    #[error(transparent)]
    Custom(#[from] CustomError),
}

impl Fault for ProcessError {
    fn kind(&self) -> observe::ErrorKind {
        match self {
            ProcessError::Accept(e) => e.kind(),
            ProcessError::Decline(e) => e.kind(),
            ProcessError::Custom(e) => e.kind(),
        }
    }
}

/// Event shaped like the messages the observer usually sees.
pub fn message() -> Value {
    json!({
        "eventId": "1234-4321-abcd-dcba",
        "schema": "my_schema",
        "type": "my_type",
        "ingestionSource": "my_source",
        "payload": {
            "field_a": true
        }
    })
}

pub fn kwargs(value: Value) -> Kwargs {
    value.as_object().cloned().unwrap_or_default()
}

/// Registry backed by recorders, so every side effect can be inspected.
pub struct Harness {
    pub metrics: Arc<MemoryMetrics>,
    pub logger: Arc<RecordingLogger>,
    pub notifier: Arc<RecordingNotifier>,
    pub defaults: Arc<Defaults>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::new())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let metrics = Arc::new(MemoryMetrics::new());
        let logger = Arc::new(RecordingLogger::new("Recording"));
        let notifier = Arc::new(notifier);
        let defaults = Defaults::new(logger.clone(), metrics.clone()).with_notifier(notifier.clone());

        Self {
            metrics,
            logger,
            notifier,
            defaults: Arc::new(defaults),
        }
    }

    /// Registry with no notifier at all.
    pub fn without_notifier() -> Self {
        let metrics = Arc::new(MemoryMetrics::new());
        let logger = Arc::new(RecordingLogger::new("Recording"));
        let defaults = Defaults::new(logger.clone(), metrics.clone());

        Self {
            metrics,
            logger,
            notifier: Arc::new(RecordingNotifier::new()),
            defaults: Arc::new(defaults),
        }
    }
}
