//! Color-coded Slack webhook client.
//!
//! To set up a Slack app and get a webhook see
//! <https://api.slack.com/messaging/webhooks>. The webhook is injected
//! explicitly or read from `SLACK_WEB_HOOK`.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

use super::{Notifier, NotifyError};

/// Environment variable holding the webhook URL.
pub const WEB_HOOK_ENV: &str = "SLACK_WEB_HOOK";
/// Environment variable naming the application in the footer.
pub const APP_NAME_ENV: &str = "APP_NAME";

const DEFAULT_APP_NAME: &str = "@observe";
/// Default connection timeout in seconds
const CONNECT_TIMEOUT_SECS: u64 = 5;
/// Default request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Severity of a notification, which selects the attachment color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
}

impl NotifyLevel {
    pub fn color(self) -> &'static str {
        match self {
            NotifyLevel::Info => "#00BFFF",
            NotifyLevel::Warning => "#FFD700",
            NotifyLevel::Error => "#FF4500",
        }
    }
}

impl std::fmt::Display for NotifyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NotifyLevel::Info => "info",
            NotifyLevel::Warning => "warning",
            NotifyLevel::Error => "error",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for NotifyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(NotifyLevel::Info),
            "warn" | "warning" => Ok(NotifyLevel::Warning),
            "error" => Ok(NotifyLevel::Error),
            other => Err(format!("unknown notification level '{other}', expected info, warning or error")),
        }
    }
}

/// Webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub color: String,
    pub author_name: String,
    pub title: String,
    pub text: String,
    pub footer: String,
    pub ts: i64,
}

/// Slack client used for unhandled-failure alerts.
///
/// Each post runs on its own thread with its own blocking client, so the
/// notifier can be created, used and dropped inside an async runtime.
pub struct SlackNotifier {
    web_hook: String,
    footer: String,
}

impl SlackNotifier {
    /// Create a notifier for `web_hook`, or for `SLACK_WEB_HOOK` when none is given.
    pub fn new(web_hook: Option<&str>) -> Result<Self, NotifyError> {
        Self::from_lookup(web_hook, |key| std::env::var(key).ok())
    }

    /// Same as [`new`](Self::new) with an explicit variable lookup.
    pub fn from_lookup(
        web_hook: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, NotifyError> {
        let web_hook = web_hook
            .filter(|hook| !hook.is_empty())
            .map(String::from)
            .or_else(|| lookup(WEB_HOOK_ENV).filter(|hook| !hook.is_empty()))
            .ok_or(NotifyError::MissingWebhook)?;

        let app_name = lookup(APP_NAME_ENV).unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        Ok(Self {
            web_hook,
            footer: format!("app_name={app_name}"),
        })
    }

    pub fn web_hook(&self) -> &str {
        &self.web_hook
    }

    pub fn footer(&self) -> &str {
        &self.footer
    }

    /// Send an info-level notification.
    pub fn info(&self, header: &str, title: &str, text: &str) -> Result<(), NotifyError> {
        self.send(NotifyLevel::Info, header, title, text)
    }

    /// Send a warning-level notification.
    pub fn warning(&self, header: &str, title: &str, text: &str) -> Result<(), NotifyError> {
        self.send(NotifyLevel::Warning, header, title, text)
    }

    /// Format and post a notification at `level`.
    pub fn send(
        &self,
        level: NotifyLevel,
        header: &str,
        title: &str,
        text: &str,
    ) -> Result<(), NotifyError> {
        let message = self.message(level, header, title, text);
        self.post(&message)
    }

    /// Build the payload without sending it.
    pub fn message(&self, level: NotifyLevel, header: &str, title: &str, text: &str) -> SlackMessage {
        SlackMessage {
            attachments: vec![Attachment {
                color: level.color().to_string(),
                author_name: header.to_string(),
                title: title.to_string(),
                text: text.to_string(),
                footer: self.footer.clone(),
                ts: chrono::Utc::now().timestamp(),
            }],
        }
    }

    fn post(&self, message: &SlackMessage) -> Result<(), NotifyError> {
        let web_hook = self.web_hook.clone();
        let message = message.clone();

        let handle = thread::Builder::new()
            .name("slack-notify".to_string())
            .spawn(move || post_blocking(&web_hook, &message))
            .map_err(|e| NotifyError::Client(e.to_string()))?;

        handle
            .join()
            .map_err(|_| NotifyError::Client("notification thread panicked".to_string()))?
    }
}

fn build_client() -> Result<Client, NotifyError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| NotifyError::Client(e.to_string()))
}

fn post_blocking(web_hook: &str, message: &SlackMessage) -> Result<(), NotifyError> {
    let response = build_client()?
        .post(web_hook)
        .json(message)
        .send()
        .map_err(|e| NotifyError::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        return Err(NotifyError::Rejected { status, body });
    }

    tracing::debug!(status = %response.status(), "slack notification sent");
    Ok(())
}

impl Notifier for SlackNotifier {
    fn error(&self, header: &str, title: &str, text: &str) -> Result<(), NotifyError> {
        self.send(NotifyLevel::Error, header, title, text)
    }
}

impl std::fmt::Debug for SlackNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackNotifier")
            .field("footer", &self.footer)
            .finish_non_exhaustive()
    }
}
