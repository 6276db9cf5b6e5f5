//! Emit command implementation
//!
//! Runs an observed no-op so the agent receives the same timing and counters
//! a real call would produce.

use std::sync::Arc;

use crate::call::{CallContext, Kwargs};
use crate::cli::output::Output;
use crate::observer::Observe;
use crate::provider::Defaults;
use crate::telemetry::{StatsdClient, StatsdConfig, TracingLogger};

/// Run the emit command
pub fn run_emit(
    host: Option<&str>,
    port: Option<u16>,
    namespace: Option<&str>,
    metric: &str,
    tags: &[String],
) -> anyhow::Result<()> {
    let mut config = StatsdConfig::from_env();
    if let Some(host) = host {
        config.host = host.to_string();
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(namespace) = namespace {
        config = config.with_namespace(namespace);
    }

    let client = Arc::new(StatsdClient::new(config)?);
    let defaults = Defaults::new(Arc::new(TracingLogger::default()), client.clone());
    let observer = Observe::new(metric)
        .static_tags(tags.iter().cloned())
        .build(Arc::new(defaults));

    let kwargs = Kwargs::new();
    let ctx = CallContext::new(&[], &kwargs).named("emit");
    observer.observe(ctx, || Ok::<_, std::io::Error>(()))?;

    Output::success(&format!("Sent to {}", client.target()));
    for suffix in ["time.finished", "finished", "start"] {
        let name = observer.config().metric_name(suffix);
        Output::kv("metric", &Output::metric_name(&name));
    }
    for tag in tags {
        Output::kv("tag", &Output::tag(tag));
    }
    Ok(())
}
