//! UI-facing handle for one running stream.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use super::driver::{self, lock, SharedSession};
use super::state::{SessionSnapshot, StreamSession, StreamStatus};
use crate::error::StreamError;
use crate::traits::{ByteStream, HttpError};

/// Handle to a stream session whose read loop runs on the tokio runtime.
///
/// Observers read the latest [`SessionSnapshot`] or subscribe to changes.
/// Dropping the handle stops the read loop.
///
/// # Example
///
/// ```ignore
/// use chatstream::StreamHandle;
///
/// let handle = StreamHandle::from_stream(bytes);
/// let mut rx = handle.subscribe();
/// while rx.changed().await.is_ok() {
///     render(&rx.borrow().text);
/// }
/// ```
pub struct StreamHandle {
    session: SharedSession,
    state_rx: watch::Receiver<SessionSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl StreamHandle {
    /// Start a session fed by a response that is still being opened.
    ///
    /// Cancelling before `connect` resolves drops the pending request.
    /// Must be called from within a tokio runtime.
    pub fn from_request<F>(connect: F) -> Self
    where
        F: Future<Output = Result<ByteStream, HttpError>> + Send + 'static,
    {
        let mut session = StreamSession::new();
        if let Err(e) = session.start() {
            warn!("Fresh stream session refused to start: {}", e);
        }
        let token = session.cancel_token();
        let state_rx = session.subscribe();
        let session = Arc::new(Mutex::new(session));

        let task = tokio::spawn(driver::run(Arc::clone(&session), token, connect));

        Self {
            session,
            state_rx,
            task: Some(task),
        }
    }

    /// Start a session fed by an already-open byte stream.
    pub fn from_stream(bytes: ByteStream) -> Self {
        Self::from_request(async move { Ok(bytes) })
    }

    /// Get the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_rx.borrow().clone()
    }

    pub fn status(&self) -> StreamStatus {
        self.state_rx.borrow().status
    }

    pub fn text(&self) -> String {
        self.state_rx.borrow().text.clone()
    }

    pub fn last_error(&self) -> Option<StreamError> {
        self.state_rx.borrow().error.clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_rx.clone()
    }

    /// Cancel the stream. The status is `Errored(Cancelled)` when this returns.
    pub fn cancel(&self) {
        lock(&self.session).cancel();
    }

    /// Stop any read in progress and discard all state, returning to `Idle`.
    pub fn reset(&self) {
        lock(&self.session).reset();
    }

    /// Whether the read loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait for the read loop to exit and return the final state.
    pub async fn wait(mut self) -> SessionSnapshot {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Stream read loop did not exit cleanly: {}", e);
            }
        }
        self.snapshot()
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if !self.is_finished() {
            lock(&self.session).cancel_token().cancel();
        }
    }
}
