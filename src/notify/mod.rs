//! Notification capability and the Slack webhook client.

pub mod slack;

use thiserror::Error;

use crate::util::type_name_of;

pub use slack::{Attachment, NotifyLevel, SlackMessage, SlackNotifier};

/// Errors that can occur while building or sending notifications
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to determine the slack web hook, inject one or set SLACK_WEB_HOOK")]
    MissingWebhook,

    #[error("Failed to set up the HTTP client: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Webhook rejected notification ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Destination for unhandled-failure alerts.
pub trait Notifier: Send + Sync {
    /// Send an error-level notification.
    fn error(&self, header: &str, title: &str, text: &str) -> Result<(), NotifyError>;

    /// Short type name, used when the notifier is the call's first argument.
    fn type_name(&self) -> &'static str {
        type_name_of::<Self>()
    }
}
