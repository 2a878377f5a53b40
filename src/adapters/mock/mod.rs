//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - Streaming transport with scripted responses
//! - [`channel_stream`] - Hand-fed byte stream for ordering and cancellation tests

pub mod http;

pub use http::{channel_stream, ChunkSender, MockHttpClient, MockResponse, RecordedRequest};
