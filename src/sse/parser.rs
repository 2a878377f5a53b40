//! SSE stream parsing logic
//!
//! Contains the stateful SseParser that turns raw byte chunks into
//! interpreted payloads: bytes → text → lines → `data: ` payloads → [`Payload`].

use tracing::debug;

use crate::sse::decoder::Utf8Decoder;
use crate::sse::events::{parse_sse_line, SseLine};
use crate::sse::framer::LineFramer;
use crate::sse::interpreter::{interpret_payload, Payload};

/// Stateful SSE parser owned by a single stream session.
///
/// Chunks must be fed in the order the transport delivered them.
#[derive(Debug, Default)]
pub struct SseParser {
    decoder: Utf8Decoder,
    framer: LineFramer,
}

impl SseParser {
    /// Create a new SSE parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next byte chunk and return the payloads of every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Payload> {
        let text = self.decoder.decode(chunk);
        if text.is_empty() {
            return Vec::new();
        }
        self.framer
            .push(&text)
            .iter()
            .filter_map(|line| self.feed_line(line))
            .collect()
    }

    /// Classify and interpret one complete line.
    ///
    /// Returns `None` for lines that carry no payload.
    pub fn feed_line(&self, line: &str) -> Option<Payload> {
        match parse_sse_line(line) {
            SseLine::Data(payload) => {
                let interpreted = interpret_payload(payload);
                debug!(
                    "data line ({} bytes) read as {}",
                    payload.len(),
                    interpreted.kind_name()
                );
                Some(interpreted)
            }
            SseLine::Empty => None,
            SseLine::Comment(comment) => {
                debug!("SSE comment ({} bytes) ignored", comment.len());
                None
            }
            SseLine::Field { name, .. } => {
                debug!("SSE field '{}' ignored", name);
                None
            }
        }
    }

    /// Flush buffered bytes and the trailing partial line at end of input.
    pub fn finish(&mut self) -> Vec<Payload> {
        let tail = self.decoder.finish();
        let mut payloads: Vec<Payload> = self
            .framer
            .push(&tail)
            .iter()
            .filter_map(|line| self.feed_line(line))
            .collect();
        if let Some(line) = self.framer.finish() {
            payloads.extend(self.feed_line(&line));
        }
        payloads
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.decoder.reset();
        self.framer.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(chunks: &[&[u8]]) -> Vec<Payload> {
        let mut parser = SseParser::new();
        let mut out = Vec::new();
        for chunk in chunks {
            out.extend(parser.feed(chunk));
        }
        out.extend(parser.finish());
        out
    }

    #[test]
    fn test_parser_simple_stream() {
        let payloads = run(&[
            b"data: {\"content\":\"ab\"}\n\ndata: {\"content\":\"cd\"}\n\ndata: [DONE]\n\n",
        ]);
        assert_eq!(
            payloads,
            vec![
                Payload::Fragment("ab".to_string()),
                Payload::Fragment("cd".to_string()),
                Payload::Terminate,
            ]
        );
    }

    #[test]
    fn test_parser_ignores_framing_noise() {
        let payloads = run(&[
            b": connected\n\nevent: message\nid: 1\nretry: 500\ndata: hi\n\n",
        ]);
        assert_eq!(payloads, vec![Payload::Fragment("hi".to_string())]);
    }

    #[test]
    fn test_parser_line_split_across_chunks() {
        let payloads = run(&[b"data: {\"cont", b"ent\":\"x\"}\r", b"\n"]);
        assert_eq!(payloads, vec![Payload::Fragment("x".to_string())]);
    }

    #[test]
    fn test_parser_multibyte_split_inside_payload() {
        let bytes = "data: héllo\n".as_bytes();
        // Split between the two bytes of 'é'
        let split = "data: h".len() + 1;
        let payloads = run(&[&bytes[..split], &bytes[split..]]);
        assert_eq!(payloads, vec![Payload::Fragment("héllo".to_string())]);
    }

    #[test]
    fn test_parser_flushes_unterminated_final_line() {
        let payloads = run(&[b"data: one\ndata: two"]);
        assert_eq!(
            payloads,
            vec![
                Payload::Fragment("one".to_string()),
                Payload::Fragment("two".to_string()),
            ]
        );
    }

    #[test]
    fn test_parser_empty_data_line() {
        let payloads = run(&[b"data: \n\n"]);
        assert_eq!(payloads, vec![Payload::Ignore]);
    }

    #[test]
    fn test_parser_reset() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: stale").is_empty());
        parser.reset();
        assert!(parser.finish().is_empty());
    }

    #[test]
    fn test_feed_line_direct() {
        let parser = SseParser::new();
        assert_eq!(parser.feed_line("data: [DONE]"), Some(Payload::Terminate));
        assert_eq!(parser.feed_line(""), None);
        assert_eq!(parser.feed_line(": ping"), None);
    }
}
