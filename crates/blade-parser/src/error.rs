//! Parse-time diagnostics.
//!
//! Malformed template text is never fatal: the lexer and tree builder record
//! what went wrong and keep going, so every input byte still ends up in the
//! output tree.

use source_span::{ByteOffset, Span};
use thiserror::Error;

/// The lexer state a diagnostic was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexState {
    Data,
    TagName,
    BeforeAttrName,
    AttrName,
    AfterAttrName,
    BeforeAttrValue,
    AttrValueQuoted,
    AttrValueUnquoted,
    RawText,
    EchoContent,
    RawEchoContent,
    TripleEchoContent,
    BladeComment,
    Comment,
    ConditionalComment,
    Cdata,
    Doctype,
    ProcessingInstruction,
    BogusComment,
    PhpTag,
    PhpBlock,
    Verbatim,
    DirectiveArgs,
}

impl LexState {
    /// Returns a human-readable name for this state.
    pub fn name(&self) -> &'static str {
        match self {
            LexState::Data => "data",
            LexState::TagName => "tag name",
            LexState::BeforeAttrName => "before attribute name",
            LexState::AttrName => "attribute name",
            LexState::AfterAttrName => "after attribute name",
            LexState::BeforeAttrValue => "before attribute value",
            LexState::AttrValueQuoted => "quoted attribute value",
            LexState::AttrValueUnquoted => "unquoted attribute value",
            LexState::RawText => "raw text",
            LexState::EchoContent => "echo content",
            LexState::RawEchoContent => "raw echo content",
            LexState::TripleEchoContent => "triple echo content",
            LexState::BladeComment => "blade comment",
            LexState::Comment => "comment",
            LexState::ConditionalComment => "conditional comment",
            LexState::Cdata => "cdata section",
            LexState::Doctype => "doctype",
            LexState::ProcessingInstruction => "processing instruction",
            LexState::BogusComment => "bogus comment",
            LexState::PhpTag => "php tag",
            LexState::PhpBlock => "php block",
            LexState::Verbatim => "verbatim block",
            LexState::DirectiveArgs => "directive arguments",
        }
    }
}

/// A non-fatal diagnostic recorded by the lexer.
///
/// The lexer degrades to emitting the remaining buffer as content after
/// recording one of these; it never aborts.
#[derive(Debug, Clone, Error)]
#[error("{reason} in {} at offset {}", state.name(), u32::from(*offset))]
pub struct LexDiagnostic {
    /// The lexer state the problem was detected in.
    pub state: LexState,
    /// What went wrong.
    pub reason: &'static str,
    /// Byte offset of the construct the problem applies to.
    pub offset: ByteOffset,
}

impl LexDiagnostic {
    /// Creates a new diagnostic.
    pub fn new(state: LexState, reason: &'static str, offset: impl Into<ByteOffset>) -> Self {
        Self {
            state,
            reason,
            offset: offset.into(),
        }
    }
}

/// An error recorded by the tree builder.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of tree-builder error.
#[derive(Debug, Clone, Error)]
pub enum ParseErrorKind {
    /// A tag reached end of input or a stray `<` before being closed.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed tag.
        tag_name: String,
    },

    /// A closing tag had no matching open element.
    #[error("unmatched closing tag: </{tag_name}>")]
    UnmatchedClosingTag {
        /// The name of the closing tag.
        tag_name: String,
    },

    /// An element was closed implicitly by an outer closing tag.
    #[error("implicitly closed tag: <{tag_name}>")]
    ImplicitlyClosedTag {
        /// The name of the implicitly closed tag.
        tag_name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextSize;

    #[test]
    fn test_diagnostic_display() {
        let diag = LexDiagnostic::new(LexState::EchoContent, "unterminated echo", 4u32);
        assert_eq!(diag.to_string(), "unterminated echo in echo content at offset 4");
    }

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::new(
            ParseErrorKind::UnclosedTag {
                tag_name: "div".to_string(),
            },
            Span::new(TextSize::from(0), TextSize::from(4)),
        );
        assert_eq!(error.to_string(), "unclosed tag: <div>");
    }
}
