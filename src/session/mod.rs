//! Stream sessions.
//!
//! - `state` - The synchronous state machine ([`StreamSession`])
//! - `driver` - Async read loop feeding a byte stream into a session
//! - `handle` - [`StreamHandle`], the surface a UI holds while streaming

mod driver;
mod handle;
mod state;

pub use handle::StreamHandle;
pub use state::{SessionSnapshot, StreamSession, StreamStatus, TransitionError};
