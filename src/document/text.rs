//! Line index for converting between byte offsets and LSP positions.
//!
//! Offsets inside the crate are byte offsets into the document text. LSP clients
//! speak line/column with columns counted in UTF-16 code units, so every value
//! crossing the protocol boundary goes through a [`LineIndex`].

use tower_lsp::lsp_types::{Position, Range};

use crate::types::TextSpan;

/// Line start table for one version of a document's text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
    source: String,
}

impl LineIndex {
    pub fn new(source: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            line_starts,
            source,
        }
    }

    /// The indexed text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of lines, counting a trailing empty line after a final newline.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Zero-based line containing the byte offset. Offsets past the end land on
    /// the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// Byte range of a line without its terminating newline.
    pub fn line_bounds(&self, line: usize) -> Option<std::ops::Range<usize>> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        Some(start..end)
    }

    /// Convert a byte offset to an LSP position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = self.line_of(offset);
        let line_start = self.line_starts[line];

        let character = self.source[line_start..]
            .char_indices()
            .take_while(|(i, _)| line_start + i < offset)
            .map(|(_, c)| c.len_utf16() as u32)
            .sum();

        Position::new(line as u32, character)
    }

    /// Convert an LSP position to a byte offset.
    ///
    /// Returns `None` when the line does not exist. Columns past the end of the
    /// line clamp to the end of the line.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let bounds = self.line_bounds(position.line as usize)?;
        let line = &self.source[bounds.clone()];

        let mut column = 0u32;
        for (i, c) in line.char_indices() {
            if column >= position.character {
                return Some(bounds.start + i);
            }
            column += c.len_utf16() as u32;
        }

        Some(bounds.end)
    }

    /// Convert a text span to an LSP range.
    pub fn span_to_range(&self, span: &TextSpan) -> Range {
        Range::new(
            self.offset_to_position(span.start),
            self.offset_to_position(span.end()),
        )
    }

    /// Convert an LSP range to a text span.
    pub fn range_to_span(&self, range: Range) -> Option<TextSpan> {
        let start = self.position_to_offset(range.start)?;
        let end = self.position_to_offset(range.end)?;
        Some(TextSpan::from_bounds(start, end.max(start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_on_single_line() {
        let idx = LineIndex::new("const x = 1;".to_string());
        assert_eq!(idx.offset_to_position(0), Position::new(0, 0));
        assert_eq!(idx.offset_to_position(6), Position::new(0, 6));
        assert_eq!(idx.offset_to_position(12), Position::new(0, 12));
    }

    #[test]
    fn positions_across_lines() {
        let idx = LineIndex::new("a\nbc\n\nd".to_string());
        assert_eq!(idx.line_count(), 4);
        assert_eq!(idx.offset_to_position(1), Position::new(0, 1));
        assert_eq!(idx.offset_to_position(2), Position::new(1, 0));
        assert_eq!(idx.offset_to_position(5), Position::new(2, 0));
        assert_eq!(idx.offset_to_position(6), Position::new(3, 0));
        assert_eq!(idx.position_to_offset(Position::new(1, 1)), Some(3));
        assert_eq!(idx.position_to_offset(Position::new(3, 0)), Some(6));
    }

    #[test]
    fn column_past_line_end_clamps() {
        let idx = LineIndex::new("ab\ncd".to_string());
        assert_eq!(idx.position_to_offset(Position::new(0, 40)), Some(2));
        assert_eq!(idx.position_to_offset(Position::new(7, 0)), None);
    }

    #[test]
    fn utf16_columns() {
        // '😀' is four UTF-8 bytes and two UTF-16 code units
        let idx = LineIndex::new("a😀b".to_string());
        assert_eq!(idx.offset_to_position(1), Position::new(0, 1));
        assert_eq!(idx.offset_to_position(5), Position::new(0, 3));
        assert_eq!(idx.position_to_offset(Position::new(0, 3)), Some(5));
    }

    #[test]
    fn span_and_range_conversion() {
        let idx = LineIndex::new("hello\nworld".to_string());
        let range = idx.span_to_range(&TextSpan::new(6, 5));
        assert_eq!(range.start, Position::new(1, 0));
        assert_eq!(range.end, Position::new(1, 5));
        assert_eq!(idx.range_to_span(range), Some(TextSpan::new(6, 5)));
    }

    #[test]
    fn line_bounds_exclude_newline() {
        let idx = LineIndex::new("ab\ncd\n".to_string());
        assert_eq!(idx.line_bounds(0), Some(0..2));
        assert_eq!(idx.line_bounds(1), Some(3..5));
        assert_eq!(idx.line_bounds(2), Some(6..6));
        assert_eq!(idx.line_bounds(3), None);
    }
}
