//! DogStatsD client, the default metric sink.
//!
//! Datagrams follow the DogStatsD text format:
//! `namespace.metric:value|ms|#tag1,tag2` for timings and `|c` for counters.
//! Sends are fire-and-forget; a failed send is logged and dropped.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use super::metrics::{MetricError, MetricSink};

/// Host of the statsd agent.
pub const HOST_ENV: &str = "DD_AGENT_HOST";
/// Port of the statsd agent.
pub const PORT_ENV: &str = "DD_DOGSTATSD_PORT";
/// Comma-separated tags added to every datagram.
pub const TAGS_ENV: &str = "DATADOG_TAGS";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8125;

/// Connection settings for [`StatsdClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsdConfig {
    pub host: String,
    pub port: u16,
    /// Prefix joined to every metric name with a dot
    pub namespace: Option<String>,
    /// Tags appended after the per-call tags
    pub constant_tags: Vec<String>,
}

impl Default for StatsdConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            namespace: None,
            constant_tags: Vec::new(),
        }
    }
}

impl StatsdConfig {
    /// Read `DD_AGENT_HOST`, `DD_DOGSTATSD_PORT` and `DATADOG_TAGS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup.
    ///
    /// Unparseable ports fall back to 8125.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup(HOST_ENV)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup(PORT_ENV)
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let constant_tags = lookup(TAGS_ENV)
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            namespace: None,
            constant_tags,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// UDP DogStatsD client.
#[derive(Debug)]
pub struct StatsdClient {
    socket: UdpSocket,
    target: SocketAddr,
    config: StatsdConfig,
}

impl StatsdClient {
    /// Resolve the agent address and bind a local socket of the same family.
    pub fn new(config: StatsdConfig) -> Result<Self, MetricError> {
        let addrs: Vec<SocketAddr> = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|e| MetricError::Resolve(format!("{}: {}", config.host, e)))?
            .collect();
        let target = addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| MetricError::Resolve(config.host.clone()))?;

        let bind = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(bind)?;

        Ok(Self {
            socket,
            target,
            config,
        })
    }

    /// Client configured from the environment.
    pub fn from_env() -> Result<Self, MetricError> {
        Self::new(StatsdConfig::from_env())
    }

    pub fn config(&self) -> &StatsdConfig {
        &self.config
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Render one datagram.
    pub fn format_datagram(&self, metric: &str, value: &str, kind: &str, tags: &[String]) -> String {
        let mut datagram = match self.config.namespace {
            Some(ref ns) => format!("{ns}.{metric}:{value}|{kind}"),
            None => format!("{metric}:{value}|{kind}"),
        };

        let all_tags: Vec<&str> = tags
            .iter()
            .chain(self.config.constant_tags.iter())
            .map(String::as_str)
            .collect();
        if !all_tags.is_empty() {
            datagram.push_str("|#");
            datagram.push_str(&all_tags.join(","));
        }
        datagram
    }

    fn send(&self, datagram: &str) {
        if let Err(e) = self.socket.send_to(datagram.as_bytes(), self.target) {
            tracing::debug!(agent = %self.target, error = %e, "statsd send failed");
        }
    }
}

impl MetricSink for StatsdClient {
    fn timing(&self, metric: &str, value_ms: u64, tags: &[String]) -> Result<(), MetricError> {
        self.send(&self.format_datagram(metric, &value_ms.to_string(), "ms", tags));
        Ok(())
    }

    fn increment(&self, metric: &str, value: i64, tags: &[String]) -> Result<(), MetricError> {
        self.send(&self.format_datagram(metric, &value.to_string(), "c", tags));
        Ok(())
    }
}
