//! Metrics capability and an in-memory recorder.
//!
//! [`MetricSink`] is the subset of a statsd client the observer calls. Its
//! methods default to distinguishable "not implemented" errors so a sink that
//! forgot to implement one is caught on first use instead of dropping data.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use crate::util::type_name_of;

/// Errors raised by metric sinks.
#[derive(Error, Debug)]
pub enum MetricError {
    #[error("{0}: timing is not implemented")]
    TimingNotImplemented(&'static str),

    #[error("{0}: increment is not implemented")]
    IncrementNotImplemented(&'static str),

    #[error("Could not resolve statsd host: {0}")]
    Resolve(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MetricError {
    /// Whether the error comes from a sink missing one of the two methods.
    pub fn is_not_implemented(&self) -> bool {
        matches!(
            self,
            Self::TimingNotImplemented(_) | Self::IncrementNotImplemented(_)
        )
    }
}

/// Destination for the observer's timings and counters.
pub trait MetricSink: Send + Sync {
    /// Record a duration in milliseconds.
    fn timing(&self, _metric: &str, _value_ms: u64, _tags: &[String]) -> Result<(), MetricError> {
        Err(MetricError::TimingNotImplemented(self.type_name()))
    }

    /// Increment a counter.
    fn increment(&self, _metric: &str, _value: i64, _tags: &[String]) -> Result<(), MetricError> {
        Err(MetricError::IncrementNotImplemented(self.type_name()))
    }

    /// Short type name, used in errors and identities.
    fn type_name(&self) -> &'static str {
        type_name_of::<Self>()
    }
}

/// The kind of a recorded emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionKind {
    Timing,
    Increment,
}

/// A single call made against a [`MemoryMetrics`] sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub kind: EmissionKind,
    pub metric: String,
    pub value: i64,
    pub tags: Vec<String>,
}

/// In-memory sink that keeps every emission plus per-metric aggregates.
#[derive(Default)]
pub struct MemoryMetrics {
    emissions: Mutex<Vec<Emission>>,
    counters: Mutex<HashMap<String, i64>>,
    timings: Mutex<HashMap<String, TimingMetrics>>,
}

impl MemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All emissions in the order they were made.
    pub fn emissions(&self) -> Vec<Emission> {
        self.emissions.lock().expect("mutex poisoned").clone()
    }

    /// Metric names in emission order.
    pub fn names(&self) -> Vec<String> {
        self.emissions
            .lock()
            .expect("mutex poisoned")
            .iter()
            .map(|e| e.metric.clone())
            .collect()
    }

    /// Current value of a counter, zero if never incremented.
    pub fn counter(&self, metric: &str) -> i64 {
        self.counters
            .lock()
            .expect("mutex poisoned")
            .get(metric)
            .copied()
            .unwrap_or(0)
    }

    /// Get a snapshot of all aggregates.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.lock().expect("mutex poisoned").clone(),
            timings: self.timings.lock().expect("mutex poisoned").clone(),
        }
    }

    /// Human-readable summary of the aggregates.
    pub fn report(&self) -> String {
        self.snapshot().format_report()
    }

    /// Forget everything recorded so far.
    pub fn reset(&self) {
        self.emissions.lock().expect("mutex poisoned").clear();
        self.counters.lock().expect("mutex poisoned").clear();
        self.timings.lock().expect("mutex poisoned").clear();
    }

    fn push(&self, kind: EmissionKind, metric: &str, value: i64, tags: &[String]) {
        self.emissions.lock().expect("mutex poisoned").push(Emission {
            kind,
            metric: metric.to_string(),
            value,
            tags: tags.to_vec(),
        });
    }
}

impl MetricSink for MemoryMetrics {
    fn timing(&self, metric: &str, value_ms: u64, tags: &[String]) -> Result<(), MetricError> {
        self.push(EmissionKind::Timing, metric, value_ms as i64, tags);
        self.timings
            .lock()
            .expect("mutex poisoned")
            .entry(metric.to_string())
            .or_default()
            .record(value_ms);
        Ok(())
    }

    fn increment(&self, metric: &str, value: i64, tags: &[String]) -> Result<(), MetricError> {
        self.push(EmissionKind::Increment, metric, value, tags);
        *self
            .counters
            .lock()
            .expect("mutex poisoned")
            .entry(metric.to_string())
            .or_insert(0) += value;
        Ok(())
    }
}

/// Aggregated timings for one metric name.
#[derive(Debug, Clone)]
pub struct TimingMetrics {
    pub count: u64,
    pub total_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    pub histogram: Histogram,
}

impl TimingMetrics {
    pub fn new() -> Self {
        Self {
            count: 0,
            total_ms: 0,
            min_ms: u64::MAX,
            max_ms: 0,
            histogram: Histogram::new(),
        }
    }

    pub fn record(&mut self, value_ms: u64) {
        self.count += 1;
        self.total_ms += value_ms;
        self.min_ms = self.min_ms.min(value_ms);
        self.max_ms = self.max_ms.max(value_ms);
        self.histogram.record(value_ms);
    }

    /// Get average duration in milliseconds.
    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms as f64 / self.count as f64
        }
    }
}

impl Default for TimingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple histogram for latency distribution.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    samples: Vec<u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn record(&mut self, value_ms: u64) {
        self.samples.push(value_ms);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Get the specified percentile.
    pub fn percentile(&self, p: u8) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }

        let mut sorted = self.samples.clone();
        sorted.sort_unstable();

        let index = (p as f64 / 100.0 * (sorted.len() - 1) as f64).round() as usize;
        Some(sorted[index.min(sorted.len() - 1)])
    }
}

/// Snapshot of all aggregates at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, i64>,
    pub timings: HashMap<String, TimingMetrics>,
}

impl MetricsSnapshot {
    /// Format as a human-readable report, sorted by metric name.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Metrics Report ===\n\n");

        if !self.counters.is_empty() {
            report.push_str("Counters:\n");
            let mut counters: Vec<_> = self.counters.iter().collect();
            counters.sort();
            for (name, value) in counters {
                report.push_str(&format!("  {}: {}\n", name, value));
            }
            report.push('\n');
        }

        if !self.timings.is_empty() {
            report.push_str("Timings:\n");
            let mut timings: Vec<_> = self.timings.iter().collect();
            timings.sort_by(|a, b| a.0.cmp(b.0));
            for (name, timing) in timings {
                report.push_str(&format!(
                    "  {}: {} samples, avg {:.2}ms, p99 {}ms\n",
                    name,
                    timing.count,
                    timing.avg_ms(),
                    timing.histogram.percentile(99).unwrap_or(0)
                ));
            }
        }

        report
    }
}
