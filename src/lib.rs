//! Chatstream - incremental consumer for streamed chat-completion responses
//!
//! Reconstructs the text of a model response from a chunked SSE body while
//! tracking loading, streaming and error state:
//!
//! raw bytes → UTF-8 decoder → line framer → `data: ` extractor →
//! payload interpreter → [`StreamSession`] (accumulates and publishes).

pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod sse;
pub mod traits;

pub use client::ChatStreamClient;
pub use config::StreamConfig;
pub use error::{ErrorKind, StreamError};
pub use session::{SessionSnapshot, StreamHandle, StreamSession, StreamStatus};
