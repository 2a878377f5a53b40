//! Payload interpretation.
//!
//! Each payload is first decoded as a structured JSON object; anything that
//! is not an object is taken as literal text. A structured payload that does
//! not match the expected shape is not treated as literal.

use tracing::debug;

use crate::sse::payloads::ChunkPayload;

/// Reserved payload that ends the stream independently of transport closure.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Result of interpreting one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Text to append to the accumulated response
    Fragment(String),
    /// Keep-alive, empty, or unrecognized structured payload
    Ignore,
    /// Explicit end of stream
    Terminate,
}

impl Payload {
    /// Returns the variant name for debugging purposes.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Payload::Fragment(_) => "fragment",
            Payload::Ignore => "ignore",
            Payload::Terminate => "terminate",
        }
    }
}

/// Interpret a payload string extracted from a `data: ` line.
pub fn interpret_payload(payload: &str) -> Payload {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Payload::Ignore;
    }
    if trimmed == DONE_SENTINEL {
        return Payload::Terminate;
    }

    let object = match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(payload)
    {
        Ok(object) => object,
        Err(e) => {
            // Not a JSON object: plain-text backend, or a malformed object.
            // Both are appended verbatim.
            debug!("Payload is not a JSON object ({}), using literal text", e);
            return Payload::Fragment(payload.to_string());
        }
    };

    let chunk = match serde_json::from_value::<ChunkPayload>(serde_json::Value::Object(object)) {
        Ok(chunk) => chunk,
        Err(e) => {
            debug!("Structured payload could not be read: {}", e);
            return Payload::Ignore;
        }
    };

    match chunk.into_fragment() {
        Some(text) if !text.is_empty() => Payload::Fragment(text),
        Some(_) => Payload::Ignore,
        None => {
            debug!("Structured payload has no content field, ignoring");
            Payload::Ignore
        }
    }
}
