//! SSE (Server-Sent Events) stream parser
//!
//! Turns the raw byte chunks of a chat-completion response into content
//! fragments. SSE format as consumed here:
//! - `data: <payload>` - payload line (JSON object or literal text)
//! - `data: [DONE]` - explicit end of stream
//! - Empty line, `: comment`, `event:`/`id:`/`retry:` - ignored
//!
//! # Module structure
//! - `decoder` - Incremental UTF-8 decoding with carry-over
//! - `framer` - Line splitting with carry-over
//! - `events` - Line classification (SseLine, extract_payload)
//! - `payloads` - Internal payload deserialization structs
//! - `interpreter` - Structured-first, literal-fallback payload interpretation
//! - `parser` - SseParser composing the stages above

mod decoder;
mod events;
mod framer;
mod interpreter;
mod parser;
mod payloads;

// Re-export public types
pub use decoder::Utf8Decoder;
pub use events::{extract_payload, parse_sse_line, SseLine, DATA_PREFIX};
pub use framer::LineFramer;
pub use interpreter::{interpret_payload, Payload, DONE_SENTINEL};
pub use parser::SseParser;
