//! Common test utilities for integration tests.
//!
//! Builders for SSE response bodies and helpers that feed a body to a
//! stream session in arbitrary chunkings.
//!
//! # Example
//!
//! ```ignore
//! use common::{sse_body, split_at};
//!
//! let body = sse_body(&["{\"content\":\"hi\"}", "[DONE]"]);
//! let snapshot = run_chunks(split_at(&body, 3)).await;
//! ```

#![allow(dead_code)]

use bytes::Bytes;
use chatstream::sse::{Payload, SseParser};
use chatstream::traits::{ByteStream, HttpError};
use chatstream::{SessionSnapshot, StreamHandle};

/// Build an SSE body from `data:` payloads, one event per payload.
pub fn sse_body(payloads: &[&str]) -> Vec<u8> {
    payloads
        .iter()
        .map(|p| format!("data: {}\n\n", p))
        .collect::<String>()
        .into_bytes()
}

/// Build a JSON content event payload.
pub fn content_event(text: &str) -> String {
    serde_json::json!({ "content": text }).to_string()
}

/// Split `body` into two chunks at byte offset `at`.
pub fn split_at(body: &[u8], at: usize) -> Vec<Vec<u8>> {
    let (head, tail) = body.split_at(at);
    vec![head.to_vec(), tail.to_vec()]
}

/// Split `body` into chunks of at most `size` bytes.
pub fn chunked(body: &[u8], size: usize) -> Vec<Vec<u8>> {
    body.chunks(size).map(|c| c.to_vec()).collect()
}

/// A byte stream that yields `chunks` and then closes cleanly.
pub fn byte_stream(chunks: Vec<Vec<u8>>) -> ByteStream {
    let items: Vec<Result<Bytes, HttpError>> =
        chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
    Box::pin(futures::stream::iter(items))
}

/// Run a full session over `chunks` and return its final state.
pub async fn run_chunks(chunks: Vec<Vec<u8>>) -> SessionSnapshot {
    StreamHandle::from_stream(byte_stream(chunks)).wait().await
}

/// Concatenate the fragments the parser yields for `chunks`, stopping at
/// the first terminate payload.
pub fn parse_text(chunks: &[Vec<u8>]) -> String {
    let mut parser = SseParser::new();
    let mut text = String::new();
    let mut payloads = Vec::new();
    for chunk in chunks {
        payloads.extend(parser.feed(chunk));
    }
    payloads.extend(parser.finish());

    for payload in payloads {
        match payload {
            Payload::Fragment(fragment) => text.push_str(&fragment),
            Payload::Ignore => {}
            Payload::Terminate => break,
        }
    }
    text
}
