//! Collaborator registry and per-call lookup.
//!
//! A call's positional arguments are searched in order for a logger, metric
//! sink or notifier: the first argument that *is* one wins, otherwise the
//! first argument that *exposes* one. Without a match the registry default is
//! used. The registry is built once, explicitly, and shared through an `Arc`.

use std::sync::Arc;
use thiserror::Error;

use crate::call::Arg;
use crate::notify::{Notifier, NotifyError, SlackNotifier};
use crate::telemetry::{Logger, MetricError, MetricSink, StatsdClient, StatsdConfig, TracingLogger};

/// Errors that can occur while building the default registry
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Metrics client setup failed: {0}")]
    Metric(#[from] MetricError),
}

/// Default collaborators used when a call provides none.
pub struct Defaults {
    logger: Arc<dyn Logger>,
    metric: Arc<dyn MetricSink>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Defaults {
    /// Registry without a notifier.
    pub fn new(logger: Arc<dyn Logger>, metric: Arc<dyn MetricSink>) -> Self {
        Self {
            logger,
            metric,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Registry built from the environment: a [`TracingLogger`], a
    /// [`StatsdClient`] and, when `SLACK_WEB_HOOK` is set, a [`SlackNotifier`].
    pub fn from_env() -> Result<Self, SetupError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SetupError> {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::default());
        let metric: Arc<dyn MetricSink> =
            Arc::new(StatsdClient::new(StatsdConfig::from_lookup(&lookup))?);
        let notifier = default_notifier(logger.as_ref(), &lookup);

        Ok(Self {
            logger,
            metric,
            notifier,
        })
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn metric(&self) -> &dyn MetricSink {
        self.metric.as_ref()
    }

    pub fn notifier(&self) -> Option<&dyn Notifier> {
        self.notifier.as_deref()
    }
}

/// A missing webhook disables notifications instead of failing setup.
fn default_notifier(
    logger: &dyn Logger,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<Arc<dyn Notifier>> {
    match SlackNotifier::from_lookup(None, lookup) {
        Ok(slack) => Some(Arc::new(slack)),
        Err(NotifyError::MissingWebhook) => {
            logger.debug(
                "@observe: can't send notification to slack, add 'SLACK_WEB_HOOK' to the environment to activate.",
            );
            None
        }
        Err(e) => {
            logger.debug(&format!("@observe: slack notifications disabled: {e}"));
            None
        }
    }
}

impl std::fmt::Debug for Defaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Defaults")
            .field("logger", &self.logger.name())
            .field("metric", &self.metric.type_name())
            .field("notifier", &self.notifier.as_ref().map(|n| n.type_name()))
            .finish()
    }
}

/// Logger for the call: from the arguments, else the registry default.
pub fn locate_logger<'a>(args: &[Arg<'a>], defaults: &'a Defaults) -> &'a dyn Logger {
    args.iter()
        .find_map(Arg::logger)
        .unwrap_or_else(|| defaults.logger())
}

/// Metric sink for the call: from the arguments, else the registry default.
pub fn locate_metric<'a>(args: &[Arg<'a>], defaults: &'a Defaults) -> &'a dyn MetricSink {
    args.iter()
        .find_map(Arg::metric)
        .unwrap_or_else(|| defaults.metric())
}

/// Notifier for the call, if any is available.
pub fn locate_notifier<'a>(args: &[Arg<'a>], defaults: &'a Defaults) -> Option<&'a dyn Notifier> {
    args.iter().find_map(Arg::notifier).or_else(|| defaults.notifier())
}
