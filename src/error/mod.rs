//! Error handling for stream sessions.
//!
//! Only two kinds of failure ever reach a session:
//!
//! | Kind | Source | Shown to the user |
//! |------|--------|-------------------|
//! | Transport | connection loss, stall timeout, error status | Yes |
//! | Cancelled | caller called `cancel()` | Usually not |
//!
//! Malformed bytes and unparseable payloads are absorbed by the parser
//! (replacement characters and literal fallback) and never become errors.

mod kind;
mod stream;

pub use kind::ErrorKind;
pub use stream::StreamError;
