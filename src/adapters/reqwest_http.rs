//! Reqwest-based streaming transport.
//!
//! This module provides the production [`HttpClient`] implementation using
//! reqwest byte streams, with an optional idle timeout between chunks.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::StreamConfig;
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use chatstream::adapters::ReqwestHttpClient;
///
/// let client = ReqwestHttpClient::new().with_idle_timeout(Some(Duration::from_secs(30)));
/// let bytes = client.post_stream(url, body, &Headers::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    /// Longest allowed gap between two body chunks
    idle_timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            idle_timeout: None,
        }
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            idle_timeout: None,
        }
    }

    /// Build a client from the connect and idle timeouts in `config`.
    pub fn from_config(config: &StreamConfig) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(Self::convert_error)?;
        Ok(Self::with_client(client).with_idle_timeout(config.idle_timeout))
    }

    /// Fail the body stream with [`HttpError::Timeout`] when no chunk arrives in time.
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else if err.is_body() || err.is_decode() {
            HttpError::Io(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// End the stream with a timeout error when `idle` passes without a chunk.
fn with_idle_timeout(stream: ByteStream, idle: Duration) -> ByteStream {
    let timed = futures::stream::unfold(Some(stream), move |state| async move {
        let mut stream = state?;
        match tokio::time::timeout(idle, stream.next()).await {
            Ok(Some(item)) => Some((item, Some(stream))),
            Ok(None) => None,
            Err(_) => {
                warn!("No response bytes for {:?}, giving up", idle);
                Some((
                    Err(HttpError::Timeout(format!(
                        "no data received for {}s",
                        idle.as_secs()
                    ))),
                    None,
                ))
            }
        }
    });
    Box::pin(timed)
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HttpError::ServerError { status, message });
        }
        debug!("Streaming response opened from {}", url);

        let stream: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map(|result| result.map_err(Self::convert_error)),
        );

        Ok(match self.idle_timeout {
            Some(idle) => with_idle_timeout(stream, idle),
            None => stream,
        })
    }
}
