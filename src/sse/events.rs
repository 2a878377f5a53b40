//! SSE line classification.
//!
//! Only `data: ` lines carry payloads for this consumer; every other line
//! (blank separators, `:` comments, `event:`/`id:`/`retry:` fields) is
//! framing noise.

/// Marker that introduces a payload line.
pub const DATA_PREFIX: &str = "data: ";

/// Represents a classified SSE line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Payload line, marker stripped (e.g. `data: {"content":"hi"}`)
    Data(&'a str),
    /// Empty line - event separator
    Empty,
    /// Comment line (starts with ':'), often used as keep-alive
    Comment(&'a str),
    /// Any other field (`event:`, `id:`, `retry:`, or `data:` without the space)
    Field { name: &'a str, value: &'a str },
}

/// Classify a single line (terminator already stripped).
pub fn parse_sse_line(line: &str) -> SseLine<'_> {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(payload);
    }

    if let Some(comment) = line.strip_prefix(':') {
        return SseLine::Comment(comment.trim());
    }

    match line.split_once(':') {
        Some((name, value)) => SseLine::Field {
            name,
            value: value.trim(),
        },
        None => SseLine::Field {
            name: line,
            value: "",
        },
    }
}

/// Return the payload of a `data: ` line, or `None` for any other line.
pub fn extract_payload(line: &str) -> Option<&str> {
    match parse_sse_line(line) {
        SseLine::Data(payload) => Some(payload),
        _ => None,
    }
}
