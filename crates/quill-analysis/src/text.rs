//! Coordinate translation between protocol positions and engine offsets.
//!
//! Every feature handler converts in both directions through [`SourceText`],
//! always built from the document's text at the moment of the request, so
//! results are never skewed by stale or inconsistent units. Counting is in
//! Unicode scalar values on both sides, never bytes.

use tower_lsp_server::ls_types::{Position, Range};

use crate::engine::Span;

/// A document's text together with its line-start table.
///
/// Line breaks are `\n`, `\r\n`, and a lone `\r`; the break characters count
/// toward the line they terminate. The table is rebuilt whenever the host
/// hands out a fresh instance; translation is never cached across requests.
///
/// # Examples
///
/// ```
/// use quill_analysis::SourceText;
/// use tower_lsp_server::ls_types::Position;
///
/// let text = SourceText::new("const x = 1;\nx.toFixed(2)\n");
/// let offset = text.offset_at(Position::new(1, 2)).unwrap();
/// assert_eq!(offset, 15);
/// assert_eq!(text.position_at(offset), Position::new(1, 2));
/// ```
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    line_starts: Vec<usize>,
    len_chars: usize,
}

impl SourceText {
    /// Builds the line-start table for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0usize];
        let mut len = 0usize;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            len += 1;
            match c {
                '\n' => line_starts.push(len),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        len += 1;
                    }
                    line_starts.push(len);
                }
                _ => {}
            }
        }
        Self {
            text,
            line_starts,
            len_chars: len,
        }
    }

    /// The underlying text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Total length in Unicode scalar values.
    pub fn len_chars(&self) -> usize {
        self.len_chars
    }

    /// Number of lines, counting the final unterminated line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Protocol position to engine offset.
    ///
    /// `None` only for lines beyond the end of the document; a character
    /// past the end of its line clamps to the line span, per protocol
    /// convention.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.len_chars);
        let character = position.character as usize;
        Some(start + character.min(end - start))
    }

    /// Engine offset to protocol position. Total: offsets past the end of
    /// the document clamp to the final position.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.len_chars);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let character = offset - self.line_starts[line];
        Position::new(line as u32, character as u32)
    }

    /// Engine span to protocol range, both endpoints derived from the same
    /// text.
    pub fn range_of(&self, span: Span) -> Range {
        Range::new(
            self.position_at(span.start),
            self.position_at(span.start.saturating_add(span.length)),
        )
    }
}
