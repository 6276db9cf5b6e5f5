//! Collaborators that remember what they were asked to do.

use std::sync::Mutex;

use observe::{Logger, MetricError, MetricSink, Notifier, NotifyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warning,
    Error,
}

/// Logger that keeps every line it receives.
pub struct RecordingLogger {
    name: String,
    records: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text)
            .collect()
    }

    fn push(&self, level: Level, text: &str) {
        self.records.lock().unwrap().push((level, text.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn debug(&self, text: &str) {
        self.push(Level::Debug, text);
    }

    fn warning(&self, text: &str) {
        self.push(Level::Warning, text);
    }

    fn error(&self, text: &str) {
        self.push(Level::Error, text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub header: String,
    pub title: String,
    pub text: String,
}

/// Notifier that keeps every notification, optionally failing to send it.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, header: &str, title: &str, text: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(Notification {
            header: header.to_string(),
            title: title.to_string(),
            text: text.to_string(),
        });
        if self.failing {
            return Err(NotifyError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Metric sink that implements neither method.
pub struct Forgetful;

impl MetricSink for Forgetful {}

/// Metric sink that only implements timings.
pub struct TimingOnly;

impl MetricSink for TimingOnly {
    fn timing(&self, _metric: &str, _value_ms: u64, _tags: &[String]) -> Result<(), MetricError> {
        Ok(())
    }
}
