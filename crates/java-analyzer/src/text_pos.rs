use std::sync::Arc;

use crate::protocol::Position;

/// Offset ↔ position mapping for one text snapshot.
///
/// Line starts are computed once in O(n); lookups are O(log n). Columns are
/// UTF-16 code units, matching the wire contract. A cursor in the request
/// buffer and a declaration span in an on-disk file are mapped through two
/// independently built indexes, never through a shared one.
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: Arc<str>,
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: Arc<str>) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            text,
            line_starts,
        }
    }

    pub fn from_str(text: &str) -> Self {
        Self::new(Arc::from(text))
    }

    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Full text of a 0-based line, without the trailing line break.
    pub fn line_text(
        &self,
        line: usize,
    ) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        let end = self.line_starts.get(line + 1).copied().unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Convert a zero-based position to a byte offset. Out-of-bounds lines
    /// clamp to the end of the text; out-of-bounds columns clamp to the end
    /// of the line.
    pub fn offset_of(
        &self,
        pos: Position,
    ) -> usize {
        let line = pos.line as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return self.text.len();
        };
        let line_end = self.line_starts.get(line + 1).copied().unwrap_or(self.text.len());
        let line_text = &self.text[line_start..line_end];

        // Character offsets are UTF-16 code-unit counts.
        let mut utf16_offset: u32 = 0;
        let mut byte_offset = line_start;
        for ch in line_text.chars() {
            if utf16_offset >= pos.character || ch == '\n' || ch == '\r' {
                break;
            }
            utf16_offset += ch.len_utf16() as u32;
            byte_offset += ch.len_utf8();
        }
        byte_offset
    }

    /// Convert a byte offset to a zero-based position. Offsets past the end
    /// of the text clamp to the final position.
    pub fn position_of(
        &self,
        offset: usize,
    ) -> Position {
        let offset = offset.min(self.text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(ins) => ins.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let character = self.text[line_start..offset].chars().map(|c| c.len_utf16() as u32).sum::<u32>();
        Position {
            line: line as u32,
            character,
        }
    }
}

#[cfg(test)]
#[path = "../tests/src/text_pos_tests.rs"]
mod tests;
