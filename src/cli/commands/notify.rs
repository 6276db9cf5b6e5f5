//! Notify command implementation
//!
//! Posts a test notification to the Slack webhook.

use crate::cli::output::Output;
use crate::notify::{NotifyLevel, SlackNotifier};

/// Run the notify command
pub fn run_notify(
    web_hook: Option<&str>,
    level: NotifyLevel,
    header: &str,
    title: &str,
    text: &str,
) -> anyhow::Result<()> {
    let slack = SlackNotifier::new(web_hook)?;
    slack.send(level, header, title, text)?;

    Output::success(&format!("Sent {} notification", level));
    Output::kv("footer", slack.footer());
    Ok(())
}
