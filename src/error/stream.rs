//! Streaming-related error types.
//!
//! This module defines the errors a stream session can end with.

use thiserror::Error;

use super::kind::ErrorKind;
use crate::traits::HttpError;

/// Error recorded on a session when it transitions to `Errored`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The connection failed or was lost mid-stream.
    #[error("Stream connection lost: {message}")]
    ConnectionLost { message: String },

    /// The transport stopped delivering bytes in time.
    #[error("Stream timeout: {message}")]
    Timeout { message: String },

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    ServerStatus { status: u16, message: String },

    /// The caller cancelled the stream.
    #[error("Stream cancelled")]
    Cancelled,
}

impl StreamError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Transport,
        }
    }

    /// Whether the caller cancelled the stream.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StreamError::Cancelled)
    }

    /// Check if starting a fresh session might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::ConnectionLost { .. } | StreamError::Timeout { .. } => true,
            StreamError::ServerStatus { status, .. } => *status >= 500 || *status == 429,
            StreamError::Cancelled => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost { .. } => {
                "Connection to the server was lost. Please try again.".to_string()
            }
            StreamError::Timeout { .. } => {
                "The server stopped responding. Please try again.".to_string()
            }
            StreamError::ServerStatus { status, message } => {
                if message.is_empty() {
                    format!("The server returned an error ({}).", status)
                } else {
                    format!("The server returned an error ({}): {}", status, message)
                }
            }
            StreamError::Cancelled => "Response cancelled.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
            StreamError::ServerStatus { .. } => "E_STREAM_STATUS",
            StreamError::Cancelled => "E_STREAM_CANCELLED",
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(message) => StreamError::Timeout { message },
            HttpError::ServerError { status, message } => {
                StreamError::ServerStatus { status, message }
            }
            HttpError::Cancelled => StreamError::Cancelled,
            other => StreamError::ConnectionLost {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(StreamError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            StreamError::Timeout {
                message: "idle".to_string()
            }
            .kind(),
            ErrorKind::Transport
        );
        assert!(StreamError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_display() {
        assert_eq!(StreamError::Cancelled.to_string(), "Stream cancelled");
        assert_eq!(
            StreamError::ServerStatus {
                status: 502,
                message: "Bad Gateway".to_string()
            }
            .to_string(),
            "Server error (502): Bad Gateway"
        );
        assert_eq!(
            StreamError::ConnectionLost {
                message: "reset".to_string()
            }
            .to_string(),
            "Stream connection lost: reset"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(StreamError::Timeout {
            message: String::new()
        }
        .is_retryable());
        assert!(StreamError::ServerStatus {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!StreamError::ServerStatus {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!StreamError::Cancelled.is_retryable());
    }

    #[test]
    fn test_from_http_error() {
        assert_eq!(
            StreamError::from(HttpError::Timeout("30s".to_string())),
            StreamError::Timeout {
                message: "30s".to_string()
            }
        );
        assert_eq!(
            StreamError::from(HttpError::ServerError {
                status: 401,
                message: "nope".to_string()
            }),
            StreamError::ServerStatus {
                status: 401,
                message: "nope".to_string()
            }
        );
        assert_eq!(StreamError::from(HttpError::Cancelled), StreamError::Cancelled);
        assert_eq!(
            StreamError::from(HttpError::Io("broken pipe".to_string())),
            StreamError::ConnectionLost {
                message: "IO error: broken pipe".to_string()
            }
        );
    }

    #[test]
    fn test_error_codes_unique() {
        let codes = [
            StreamError::ConnectionLost {
                message: String::new(),
            }
            .error_code(),
            StreamError::Timeout {
                message: String::new(),
            }
            .error_code(),
            StreamError::ServerStatus {
                status: 500,
                message: String::new(),
            }
            .error_code(),
            StreamError::Cancelled.error_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
