//! Line index for efficient offset ↔ line/column conversion.

use crate::{ByteOffset, Span};
use text_size::TextSize;

/// A line and column position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within the line).
    pub col: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// The range of lines covered by a span (0-indexed, inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSpan {
    /// The first line the span touches.
    pub start_line: u32,
    /// The last line the span touches.
    pub end_line: u32,
}

impl LineSpan {
    /// Returns true if the given line falls within this line span.
    #[inline]
    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Returns true if the span covers more than one line.
    #[inline]
    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }
}

/// An index for efficient conversion between byte offsets and line/column positions.
///
/// The index stores the byte offset of the start of each line, enabling O(log n)
/// lookups in both directions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    /// `line_starts[i]` is the offset where line `i` begins.
    line_starts: Vec<ByteOffset>,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];

        for (offset, c) in text.char_indices() {
            if c == '\n' {
                // Next line starts after the newline
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }

        Self { line_starts }
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Returns `None` if the offset is out of bounds.
    pub fn line_col(&self, offset: ByteOffset) -> Option<LineCol> {
        // Binary search for the line containing this offset
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };

        if line >= self.line_starts.len() {
            return None;
        }

        let line_start = self.line_starts[line];
        let col = u32::from(offset) - u32::from(line_start);

        Some(LineCol {
            line: line as u32,
            col,
        })
    }

    /// Returns the range of lines a span touches.
    ///
    /// The end position of a span is exclusive, so a span ending exactly at
    /// the start of a line does not count as touching that line (unless it
    /// is empty).
    pub fn line_span(&self, span: Span) -> Option<LineSpan> {
        let start = self.line_col(span.start)?;
        let end_offset = if span.is_empty() {
            span.end
        } else {
            span.end - TextSize::from(1)
        };
        let end = self.line_col(end_offset)?;
        Some(LineSpan {
            start_line: start.line,
            end_line: end.line.max(start.line),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("hello world");
        assert_eq!(index.line_col(TextSize::from(0)), Some(LineCol::new(0, 0)));
        assert_eq!(index.line_col(TextSize::from(5)), Some(LineCol::new(0, 5)));
    }

    #[test]
    fn test_multiple_lines() {
        let index = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(index.line_col(TextSize::from(0)), Some(LineCol::new(0, 0)));
        assert_eq!(index.line_col(TextSize::from(5)), Some(LineCol::new(0, 5)));
        assert_eq!(index.line_col(TextSize::from(6)), Some(LineCol::new(1, 0)));
        assert_eq!(index.line_col(TextSize::from(10)), Some(LineCol::new(1, 4)));
        assert_eq!(index.line_col(TextSize::from(12)), Some(LineCol::new(2, 0)));
    }

    #[test]
    fn test_line_span_single_line() {
        let index = LineIndex::new("@if($x)\n  ok\n@endif\n");
        let span = Span::new(0u32, 7u32);
        let lines = index.line_span(span).unwrap();
        assert_eq!(lines.start_line, 0);
        assert_eq!(lines.end_line, 0);
        assert!(!lines.is_multiline());
        assert!(lines.contains_line(0));
        assert!(!lines.contains_line(1));
    }

    #[test]
    fn test_line_span_multiline() {
        let text = "@if($x)\n  ok\n@endif\n";
        let index = LineIndex::new(text);
        let span = Span::new(0u32, text.len() as u32 - 1);
        let lines = index.line_span(span).unwrap();
        assert_eq!(lines.start_line, 0);
        assert_eq!(lines.end_line, 2);
        assert!(lines.is_multiline());
        assert!(lines.contains_line(1));
    }

    #[test]
    fn test_line_span_excludes_exclusive_end() {
        // Span ends exactly at the start of line 1; it only touches line 0.
        let index = LineIndex::new("ab\ncd");
        let span = Span::new(0u32, 3u32);
        let lines = index.line_span(span).unwrap();
        assert_eq!(lines.end_line, 0);
    }
}
