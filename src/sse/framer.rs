//! Line framing over decoded text.
//!
//! Splits text on `\n`, strips a `\r` that directly precedes the newline,
//! and buffers the unterminated tail until a later chunk completes it.

/// Stateful line splitter.
#[derive(Debug, Default)]
pub struct LineFramer {
    /// Unterminated trailing text. Never contains `\n`.
    carry: String,
}

impl LineFramer {
    /// Create a new framer with an empty carry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text fragment and return every line it completes, in order.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        self.carry.push_str(text);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.carry[start..].find('\n') {
            let end = start + offset;
            lines.push(strip_cr(&self.carry[start..end]).to_string());
            start = end + 1;
        }
        if start > 0 {
            self.carry.drain(..start);
        }
        lines
    }

    /// Emit the remaining carry as a final line, if it is non-empty.
    pub fn finish(&mut self) -> Option<String> {
        let tail = std::mem::take(&mut self.carry);
        let line = strip_cr(&tail);
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.carry.len()
    }

    /// Drop any buffered partial line.
    pub fn reset(&mut self) {
        self.carry.clear();
    }
}

fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
