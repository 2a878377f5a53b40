//! Incremental UTF-8 decoding of raw byte chunks.
//!
//! Network reads split the body at arbitrary byte offsets, so a multi-byte
//! character can straddle two chunks. The decoder returns the longest
//! decodable prefix of each chunk and keeps the trailing partial character
//! until the next chunk completes it.

use tracing::warn;

const REPLACEMENT: char = '\u{FFFD}';

/// Stateful UTF-8 decoder that carries incomplete characters between chunks.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Bytes of an incomplete trailing character. Never a complete one.
    carry: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a new decoder with an empty carry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk.
    ///
    /// Invalid byte sequences are replaced with U+FFFD. An incomplete
    /// sequence at the end of the chunk is held back for the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        if chunk.is_empty() {
            return String::new();
        }

        let joined;
        let input: &[u8] = if self.carry.is_empty() {
            chunk
        } else {
            let mut buf = std::mem::take(&mut self.carry);
            buf.extend_from_slice(chunk);
            joined = buf;
            &joined
        };

        let mut out = String::with_capacity(input.len());
        let mut pieces = input.utf8_chunks().peekable();
        while let Some(piece) = pieces.next() {
            out.push_str(piece.valid());
            let invalid = piece.invalid();
            if invalid.is_empty() {
                continue;
            }
            // Only the end of the input can hold a character the next chunk completes
            if pieces.peek().is_none() && is_incomplete(invalid) {
                self.carry.extend_from_slice(invalid);
            } else {
                warn!("Replacing {} invalid byte(s) in stream", invalid.len());
                out.push(REPLACEMENT);
            }
        }
        out
    }

    /// Flush the carry at end of input.
    ///
    /// A truncated trailing character cannot be completed any more, so it is
    /// decoded lossily instead of being dropped.
    pub fn finish(&mut self) -> String {
        if self.carry.is_empty() {
            return String::new();
        }
        warn!(
            "Stream ended inside a multi-byte character ({} byte(s) pending)",
            self.carry.len()
        );
        let tail = String::from_utf8_lossy(&self.carry).into_owned();
        self.carry.clear();
        tail
    }

    #[cfg(test)]
    fn has_pending(&self) -> bool {
        !self.carry.is_empty()
    }

    /// Drop any carried bytes.
    pub fn reset(&mut self) {
        self.carry.clear();
    }
}

/// Whether `bytes` is the start of a valid sequence that was cut short.
fn is_incomplete(bytes: &[u8]) -> bool {
    matches!(std::str::from_utf8(bytes), Err(e) if e.error_len().is_none())
}
