//! Stream session state machine.
//!
//! `Idle → Streaming → {Completed | Errored}`. The accumulated text, status
//! and last error live inside a `watch` channel, so every mutation is also
//! the publish step. Subscribers always see the latest state.

use std::fmt;

use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::StreamError;

/// Lifecycle status of a stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamStatus {
    #[default]
    Idle,
    Streaming,
    Completed,
    Errored,
}

impl StreamStatus {
    /// `Completed` and `Errored` can only be left through `reset()`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamStatus::Completed | StreamStatus::Errored)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Idle => "idle",
            StreamStatus::Streaming => "streaming",
            StreamStatus::Completed => "completed",
            StreamStatus::Errored => "errored",
        }
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Published view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Full reconstructed response so far
    pub text: String,
    pub status: StreamStatus,
    /// Set only when `status` is `Errored`
    pub error: Option<StreamError>,
}

/// Returned when `start()` is called outside `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot start a session that is {0}")]
pub struct TransitionError(pub StreamStatus);

/// State of one streaming request.
#[derive(Debug)]
pub struct StreamSession {
    state_tx: watch::Sender<SessionSnapshot>,
    cancel: CancellationToken,
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamSession {
    /// Create an idle session.
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(SessionSnapshot::default());
        Self {
            state_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to state changes. Receivers survive `reset()`.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_tx.borrow().clone()
    }

    pub fn status(&self) -> StreamStatus {
        self.state_tx.borrow().status
    }

    pub fn text(&self) -> String {
        self.state_tx.borrow().text.clone()
    }

    pub fn last_error(&self) -> Option<StreamError> {
        self.state_tx.borrow().error.clone()
    }

    /// Token cancelled by `cancel()` and `reset()`. Readers of the byte
    /// source stop when it fires.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// `Idle → Streaming`.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        let status = self.status();
        if status != StreamStatus::Idle {
            return Err(TransitionError(status));
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
        self.state_tx.send_modify(|s| {
            s.text.clear();
            s.error = None;
            s.status = StreamStatus::Streaming;
        });
        info!("Stream session started");
        Ok(())
    }

    /// Append a fragment. Returns `false` if it was discarded.
    ///
    /// Fragments are only applied while `Streaming` and not cancelled.
    pub fn on_fragment(&mut self, text: &str) -> bool {
        let status = self.status();
        if status != StreamStatus::Streaming {
            debug!(
                "Discarding {} byte fragment in {} state",
                text.len(),
                status
            );
            return false;
        }
        if self.cancel.is_cancelled() {
            self.cancel();
            return false;
        }
        self.state_tx.send_modify(|s| s.text.push_str(text));
        true
    }

    /// Explicit end-of-stream marker received: `Streaming → Completed`.
    pub fn on_terminate(&mut self) {
        if self.status() != StreamStatus::Streaming {
            return;
        }
        self.complete("end-of-stream marker");
    }

    /// The byte source closed. Absence of the marker is not an error.
    pub fn on_transport_end(&mut self) {
        if self.status() != StreamStatus::Streaming {
            return;
        }
        self.complete("transport closed");
    }

    /// Record an error. The first error of a session wins.
    pub fn on_error(&mut self, error: StreamError) {
        let (status, previous, received) = {
            let state = self.state_tx.borrow();
            (
                state.status,
                state.error.as_ref().map(|e| e.error_code()),
                state.text.len(),
            )
        };
        if status == StreamStatus::Errored {
            debug!(
                "Session already errored ({}), ignoring {}",
                previous.unwrap_or("unknown"),
                error.error_code()
            );
            return;
        }
        if error.is_cancelled() {
            info!("Stream session cancelled after {} bytes", received);
        } else {
            warn!("Stream session failed [{}]: {}", error.error_code(), error);
        }
        self.cancel.cancel();
        self.state_tx.send_modify(|s| {
            s.status = StreamStatus::Errored;
            s.error = Some(error);
        });
    }

    /// Caller-initiated cancellation.
    ///
    /// Stops the byte source. A session that already finished keeps its
    /// terminal state.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if self.status().is_terminal() {
            return;
        }
        self.on_error(StreamError::Cancelled);
    }

    /// Discard all state and return to `Idle`.
    pub fn reset(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.state_tx.send_modify(|s| *s = SessionSnapshot::default());
        debug!("Stream session reset");
    }

    fn complete(&mut self, reason: &str) {
        self.state_tx.send_modify(|s| s.status = StreamStatus::Completed);
        info!(
            "Stream session completed ({}), {} bytes",
            reason,
            self.state_tx.borrow().text.len()
        );
    }
}
