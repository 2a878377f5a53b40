//! Error kind classification.

use std::fmt;

/// High-level classification of session errors.
///
/// Only transport failures and cancellations ever reach a session; decode
/// problems are absorbed by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The byte source failed (connection, timeout, error status).
    Transport,

    /// The caller cancelled the stream.
    Cancelled,
}

impl ErrorKind {
    /// Whether a UI should present this as a failure.
    ///
    /// Cancellations are caller-initiated and usually not shown as errors.
    pub fn is_user_visible_failure(&self) -> bool {
        matches!(self, ErrorKind::Transport)
    }

    /// Returns a short label suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(ErrorKind::Transport.is_user_visible_failure());
        assert!(!ErrorKind::Cancelled.is_user_visible_failure());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Transport.to_string(), "transport");
        assert_eq!(ErrorKind::Cancelled.to_string(), "cancelled");
    }
}
