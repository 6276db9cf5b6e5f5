use crate::telemetry::{MetricError, MetricSink};

/// Emits the `start` counter when a call leaves the observer.
///
/// The regular paths call [`finish`](Finalizer::finish) and see the sink's
/// error. If the wrapped callable panics, the counter is emitted on drop and a
/// sink error can only be logged.
pub(crate) struct Finalizer<'a> {
    sink: &'a dyn MetricSink,
    metric: String,
    pub(crate) tags: Vec<String>,
    armed: bool,
}

impl<'a> Finalizer<'a> {
    pub(crate) fn new(sink: &'a dyn MetricSink, metric: String, tags: Vec<String>) -> Self {
        Self {
            sink,
            metric,
            tags,
            armed: true,
        }
    }

    pub(crate) fn finish(mut self) -> Result<(), MetricError> {
        self.armed = false;
        self.emit()
    }

    fn emit(&self) -> Result<(), MetricError> {
        self.sink.increment(&self.metric, 1, &self.tags)
    }
}

impl Drop for Finalizer<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Err(e) = self.emit() {
            tracing::debug!(metric = %self.metric, error = %e, "Failed to emit start counter");
        }
    }
}
