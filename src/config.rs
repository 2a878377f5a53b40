//! Stream client configuration.

use std::time::Duration;

use tracing::warn;

use crate::traits::Headers;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/chat/stream";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

/// Configuration for a [`ChatStreamClient`](crate::ChatStreamClient).
///
/// Use the builder pattern to customize it.
///
/// # Example
///
/// ```ignore
/// use chatstream::StreamConfig;
///
/// let config = StreamConfig::default()
///     .with_endpoint("https://llm.internal/v1/chat/stream")
///     .with_idle_timeout(None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    /// URL the streaming request is POSTed to
    pub endpoint: String,
    /// Extra request headers
    pub headers: Headers,
    /// TCP/TLS connect timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Longest gap between body chunks before the transport gives up
    /// (default: 60s, `None` disables)
    pub idle_timeout: Option<Duration>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            headers: Headers::new(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)),
        }
    }
}

impl StreamConfig {
    /// Create a new StreamConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add an `Authorization: Bearer` header.
    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {}", token))
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle timeout (`None` disables it).
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Create config from environment variables.
    ///
    /// - `CHATSTREAM_ENDPOINT`
    /// - `CHATSTREAM_API_KEY` (sent as a bearer token)
    /// - `CHATSTREAM_CONNECT_TIMEOUT_SECS`
    /// - `CHATSTREAM_IDLE_TIMEOUT_SECS` (`0` disables)
    ///
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("CHATSTREAM_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config = config.with_endpoint(endpoint.trim());
            }
        }

        if let Ok(key) = std::env::var("CHATSTREAM_API_KEY") {
            if !key.is_empty() {
                config = config.with_bearer_token(&key);
            }
        }

        if let Some(secs) = env_secs("CHATSTREAM_CONNECT_TIMEOUT_SECS") {
            config = config.with_connect_timeout(Duration::from_secs(secs));
        }

        if let Some(secs) = env_secs("CHATSTREAM_IDLE_TIMEOUT_SECS") {
            let idle = (secs > 0).then(|| Duration::from_secs(secs));
            config = config.with_idle_timeout(idle);
        }

        config
    }
}

fn env_secs(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}
