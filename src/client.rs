//! Chat stream client.
//!
//! Sends the caller's request body to the configured endpoint and hands the
//! response body to a new [`StreamHandle`].

use std::sync::Arc;

use tracing::debug;

use crate::adapters::ReqwestHttpClient;
use crate::config::StreamConfig;
use crate::session::StreamHandle;
use crate::traits::{HttpClient, HttpError};

/// Client that opens one streaming session per request.
pub struct ChatStreamClient<C: HttpClient = ReqwestHttpClient> {
    config: StreamConfig,
    http: Arc<C>,
}

impl ChatStreamClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest, using the timeouts in `config`.
    pub fn new(config: StreamConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::from_config(&config)?;
        Ok(Self::with_http_client(config, http))
    }
}

impl<C: HttpClient + 'static> ChatStreamClient<C> {
    /// Create a client with a custom transport.
    pub fn with_http_client(config: StreamConfig, http: C) -> Self {
        Self {
            config,
            http: Arc::new(http),
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Start streaming a response for `body`.
    ///
    /// Returns immediately; the request is sent from the session's read loop
    /// so it can be cancelled while still connecting. A request that fails
    /// before any bytes arrive leaves the session `Errored`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn stream(&self, body: &serde_json::Value) -> StreamHandle {
        let http = Arc::clone(&self.http);
        let url = self.config.endpoint.clone();
        let mut headers = self.config.headers.clone();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        let body = body.to_string();

        debug!("Opening stream to {} ({} byte body)", url, body.len());
        StreamHandle::from_request(async move { http.post_stream(&url, &body, &headers).await })
    }
}
