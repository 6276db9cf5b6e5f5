//! The observation wrapper.
//!
//! Every observed call falls into one of four categories:
//! - it finished: its result is handed back as [`Handled::Finished`]
//! - it failed with a kind in `accept_on`: [`Handled::Accepted`], acknowledge the work
//! - it failed with a kind in `decline_on`: [`Handled::Declined`], don't acknowledge it
//! - it failed with any other kind: the error is handed back as [`ObserveError::Raised`]
//!
//! Each category logs, times and counts itself under the configured metric
//! prefix, and unhandled failures are also sent to the notifier if one is
//! available. The `{metric}.start` counter is emitted on every exit path.

mod finalize;
mod outcome;

pub use outcome::{ErrorKind, Fault, Handled, ObserveError, Outcome};

use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::call::{Arg, CallContext, Kwargs};
use crate::provider::{locate_logger, locate_metric, locate_notifier, Defaults};
use crate::resolve::{
    resolve_identity, resolve_observed_sli_tag, resolve_tags_from, resolve_trace_id, TagsFrom,
    TraceIdFrom,
};
use crate::telemetry::{MetricError, MetricSink};
use finalize::Finalizer;

/// Name reported for calls that were not given one.
const ANONYMOUS: &str = "<anonymous>";

/// Immutable per-decoration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserveConfig {
    metric: String,
    accept_on: Vec<ErrorKind>,
    decline_on: Vec<ErrorKind>,
    static_tags: Vec<String>,
    tags_from: TagsFrom,
    trace_id_from: TraceIdFrom,
    observed_sli: bool,
}

impl ObserveConfig {
    /// Metric-name prefix.
    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn accept_on(&self) -> &[ErrorKind] {
        &self.accept_on
    }

    pub fn decline_on(&self) -> &[ErrorKind] {
        &self.decline_on
    }

    pub fn static_tags(&self) -> &[String] {
        &self.static_tags
    }

    pub fn tags_from(&self) -> &TagsFrom {
        &self.tags_from
    }

    pub fn trace_id_from(&self) -> &TraceIdFrom {
        &self.trace_id_from
    }

    pub fn observed_sli(&self) -> bool {
        self.observed_sli
    }

    /// `{metric}.{suffix}`
    pub fn metric_name(&self, suffix: &str) -> String {
        format!("{}.{}", self.metric, suffix)
    }
}

/// Builder for an [`Observer`].
///
/// ```rust,ignore
/// let observer = Observe::new("orders.consume")
///     .accept_on([ErrorKind::of::<Duplicate>()])
///     .decline_on([ErrorKind::of::<Unavailable>()])
///     .static_tags(["team:orders"])
///     .tags_from(TagsFrom::new().field("message", ["type", "schema"]))
///     .trace_id_from(TraceIdFrom::new().field("message", "eventId"))
///     .build(defaults);
/// ```
#[derive(Debug, Clone)]
pub struct Observe {
    config: ObserveConfig,
}

impl Observe {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            config: ObserveConfig {
                metric: metric.into(),
                accept_on: Vec::new(),
                decline_on: Vec::new(),
                static_tags: Vec::new(),
                tags_from: TagsFrom::default(),
                trace_id_from: TraceIdFrom::default(),
                observed_sli: false,
            },
        }
    }

    /// Kinds that are acknowledged and suppressed.
    pub fn accept_on(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        extend_unique(&mut self.config.accept_on, kinds);
        self
    }

    /// Kinds that are suppressed without acknowledgement.
    pub fn decline_on(mut self, kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        extend_unique(&mut self.config.decline_on, kinds);
        self
    }

    /// Tags appended to every emission, after the resolved ones.
    pub fn static_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .static_tags
            .extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn tags_from(mut self, tags_from: TagsFrom) -> Self {
        self.config.tags_from = tags_from;
        self
    }

    pub fn trace_id_from(mut self, trace_id_from: TraceIdFrom) -> Self {
        self.config.trace_id_from = trace_id_from;
        self
    }

    /// Tag outcome emissions with their latency bucket.
    pub fn observed_sli(mut self, enabled: bool) -> Self {
        self.config.observed_sli = enabled;
        self
    }

    pub fn config(&self) -> &ObserveConfig {
        &self.config
    }

    pub fn build(self, defaults: Arc<Defaults>) -> Observer {
        Observer {
            config: Arc::new(self.config),
            defaults,
        }
    }
}

fn extend_unique(kinds: &mut Vec<ErrorKind>, more: impl IntoIterator<Item = ErrorKind>) {
    for kind in more {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
}

/// Observes calls according to one [`ObserveConfig`].
#[derive(Debug, Clone)]
pub struct Observer {
    config: Arc<ObserveConfig>,
    defaults: Arc<Defaults>,
}

impl Observer {
    pub fn config(&self) -> &ObserveConfig {
        &self.config
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Wrap `f` so each [`Observed::call`] is observed under `name`.
    pub fn wrap<F, T, E>(&self, name: impl Into<String>, f: F) -> Observed<F>
    where
        F: Fn(&[Arg<'_>], &Kwargs) -> Result<T, E>,
        E: Fault,
    {
        Observed {
            observer: self.clone(),
            name: name.into(),
            f,
        }
    }

    /// Observe one invocation of `f`, described by `ctx`.
    pub fn observe<T, E, F>(&self, ctx: CallContext<'_>, f: F) -> Result<Handled<T>, ObserveError<E>>
    where
        E: Fault,
        F: FnOnce() -> Result<T, E>,
    {
        let trace_id = resolve_trace_id(&self.config.trace_id_from, ctx.kwargs);
        let identity = resolve_identity(ctx.args, ctx.name, &trace_id);
        let mut tags = resolve_tags_from(&self.config.tags_from, ctx.kwargs);
        tags.extend(self.config.static_tags.iter().cloned());

        let metric = locate_metric(ctx.args, &self.defaults);
        let mut guard = Finalizer::new(metric, self.config.metric_name("start"), tags);
        let started = Instant::now();

        let outcome = Outcome::classify(f(), &self.config.accept_on, &self.config.decline_on);
        let elapsed = started.elapsed();

        let settled = self.settle(outcome, elapsed, &identity, &ctx, metric, &mut guard.tags);
        match guard.finish() {
            Ok(()) => settled,
            Err(e) => Err(ObserveError::Metric(e)),
        }
    }

    fn settle<T, E: Fault>(
        &self,
        outcome: Outcome<T, E>,
        elapsed: Duration,
        identity: &str,
        ctx: &CallContext<'_>,
        metric: &dyn MetricSink,
        tags: &mut Vec<String>,
    ) -> Result<Handled<T>, ObserveError<E>> {
        if let Some(e) = outcome.error() {
            tags.push(format!("exception:{}", e.kind().name()));
        }

        // Timings are reported in whole seconds; the SLI bucket needs millis.
        let elapsed_ms = elapsed.as_secs() * 1000;
        let mut outcome_tags = tags.clone();
        if self.config.observed_sli {
            let observed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
            outcome_tags.push(resolve_observed_sli_tag(observed_ms));
        }

        let timing = self.config.metric_name(outcome.timing_suffix());
        let counter = self.config.metric_name(outcome.counter_suffix());
        let verb = outcome.verb();
        let name = ctx.name.unwrap_or(ANONYMOUS);
        tracing::debug!(metric = %self.config.metric, outcome = verb, elapsed_ms, "Observed call");

        match outcome {
            Outcome::Success(value) => {
                emit(metric, &timing, &counter, elapsed_ms, &outcome_tags)?;
                Ok(Handled::Finished(value))
            }
            Outcome::Accepted(e) => {
                let failure = Failure::new(&e, identity, name, verb);
                locate_logger(ctx.args, &self.defaults).warning(&failure.report());
                emit(metric, &timing, &counter, elapsed_ms, &outcome_tags)?;
                Ok(Handled::Accepted)
            }
            Outcome::Declined(e) => {
                let failure = Failure::new(&e, identity, name, verb);
                locate_logger(ctx.args, &self.defaults).error(&failure.report());
                emit(metric, &timing, &counter, elapsed_ms, &outcome_tags)?;
                Ok(Handled::Declined)
            }
            Outcome::Unhandled(e) => {
                let failure = Failure::new(&e, identity, name, verb);
                let logger = locate_logger(ctx.args, &self.defaults);
                logger.error(&failure.report());
                emit(metric, &timing, &counter, elapsed_ms, &outcome_tags)?;

                if let Some(notifier) = locate_notifier(ctx.args, &self.defaults) {
                    let sent = notifier.error(identity, failure.kind.name(), &failure.notification());
                    if let Err(n) = sent {
                        logger.warning(&format!(
                            "{identity}: failed to notify {} about '{name}': {n}",
                            notifier.type_name()
                        ));
                    }
                }
                Err(ObserveError::Raised(e))
            }
        }
    }
}

fn emit(
    metric: &dyn MetricSink,
    timing: &str,
    counter: &str,
    elapsed_ms: u64,
    tags: &[String],
) -> Result<(), MetricError> {
    metric.timing(timing, elapsed_ms, tags)?;
    metric.increment(counter, 1, tags)
}

/// What gets logged and notified about a failed call.
struct Failure<'a> {
    identity: &'a str,
    kind: ErrorKind,
    message: String,
    name: &'a str,
    verb: &'static str,
    trace: String,
}

impl<'a> Failure<'a> {
    fn new<E: Fault>(error: &E, identity: &'a str, name: &'a str, verb: &'static str) -> Self {
        Self {
            identity,
            kind: error.kind(),
            message: error.to_string(),
            name,
            verb,
            trace: trace(error),
        }
    }

    /// `{identity}: {Kind}({message}) during '{name}' {verb}.` then the trace.
    fn report(&self) -> String {
        format!(
            "{}: {}({}) during '{}' {}.\n{}",
            self.identity, self.kind, self.message, self.name, self.verb, self.trace
        )
    }

    fn notification(&self) -> String {
        format!("{}\n{}", self.message, self.trace)
    }
}

/// Source chain of `error`, then a backtrace.
///
/// The backtrace is the one the error carries through [`Fault::backtrace`].
/// Without one, the observation point is captured instead, which only
/// yields frames when `RUST_BACKTRACE` (or `RUST_LIB_BACKTRACE`) enables it.
fn trace<E: Fault>(error: &E) -> String {
    let mut lines = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(format!("Caused by: {cause}"));
        source = cause.source();
    }

    match error.backtrace() {
        Some(backtrace) if backtrace.status() == BacktraceStatus::Captured => {
            lines.push(backtrace.to_string());
        }
        _ => {
            let backtrace = Backtrace::capture();
            if backtrace.status() == BacktraceStatus::Captured {
                lines.push(backtrace.to_string());
            }
        }
    }

    lines.join("\n")
}

/// A callable bound to an [`Observer`] under a fixed name.
pub struct Observed<F> {
    observer: Observer,
    name: String,
    f: F,
}

impl<F> Observed<F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Call the wrapped callable with `args` and `kwargs`, observed.
    pub fn call<T, E>(&self, args: &[Arg<'_>], kwargs: &Kwargs) -> Result<Handled<T>, ObserveError<E>>
    where
        F: Fn(&[Arg<'_>], &Kwargs) -> Result<T, E>,
        E: Fault,
    {
        let ctx = CallContext::new(args, kwargs).named(&self.name);
        self.observer.observe(ctx, || (self.f)(args, kwargs))
    }
}

impl<F> std::fmt::Debug for Observed<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observed")
            .field("name", &self.name)
            .field("observer", &self.observer)
            .finish()
    }
}
