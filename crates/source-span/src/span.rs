//! Byte spans over template source text.

use text_size::TextSize;

/// A byte offset into template source.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)` over the template source.
///
/// Every token and node carries one. A clean node renders by slicing its
/// span back out of the source, which is what makes parsing lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Creates a span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// True for zero-width spans, such as synthetic close markers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The slice of `source` this span covers.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[u32::from(self.start) as usize..u32::from(self.end) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_recovers_source_text() {
        let source = "@if($x) yes @endif";
        assert_eq!(Span::new(0u32, 7u32).slice(source), "@if($x)");
        assert_eq!(Span::new(12u32, 18u32).slice(source), "@endif");
    }

    #[test]
    fn test_synthetic_marker_is_empty() {
        let span = Span::new(4u32, 4u32);
        assert!(span.is_empty());
        assert_eq!(span.slice("<li>x"), "");
        assert!(!Span::new(0u32, 4u32).is_empty());
    }
}
