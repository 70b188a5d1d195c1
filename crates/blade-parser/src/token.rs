//! Token types produced by the lexer.
//!
//! Tokens carry byte spans into the original source. The lexer guarantees
//! that tokens are emitted in strictly increasing order, never overlap, and
//! that their concatenation reproduces the source exactly (the trailing
//! `Eof` token is zero-width).

use source_span::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span of the token in the source.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the text of this token in the given source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

/// Token kinds for Blade template syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Plain template text.
    Text,

    /// The `@` of an escape sequence (`@@`, `@{{`, `@{!!`, `@{{{`).
    /// Zero or more bytes of suppressed opener follow as `Text`.
    EscapedAt,

    /// `{{`
    EchoOpen,
    /// The expression between `{{` and `}}`.
    EchoContent,
    /// `}}`
    EchoClose,

    /// `{!!`
    RawEchoOpen,
    /// The expression between `{!!` and `!!}`.
    RawEchoContent,
    /// `!!}`
    RawEchoClose,

    /// `{{{`
    TripleEchoOpen,
    /// The expression between `{{{` and `}}}`.
    TripleEchoContent,
    /// `}}}`
    TripleEchoClose,

    /// A whole `{{-- ... --}}` comment.
    BladeComment,

    /// `@name` (the `@` plus the directive name, original case).
    DirectiveName,
    /// Optional whitespace plus a parenthesized argument list, `(...)`.
    DirectiveArgs,

    /// Raw PHP between `@php` and `@endphp`.
    PhpContent,
    /// Literal text between `@verbatim` and `@endverbatim`.
    VerbatimContent,

    /// A whole `<?php ... ?>` region.
    PhpTag,
    /// A whole `<?= ... ?>` region.
    PhpShortEcho,

    /// A whole `<!-- ... -->` comment.
    HtmlComment,
    /// A whole `<!--[if ...]> ... <![endif]-->` conditional comment.
    ConditionalComment,
    /// A whole `<![CDATA[ ... ]]>` section.
    Cdata,
    /// A whole `<!DOCTYPE ...>` declaration.
    Doctype,
    /// A whole `<? ... ?>` processing instruction (non-PHP).
    ProcessingInstruction,
    /// A whole `<!...>` bogus comment.
    BogusComment,

    /// `<`
    TagOpen,
    /// `</`
    CloseTagOpen,
    /// A literal chunk of a tag name.
    TagNamePart,
    /// Whitespace inside a tag.
    TagWhitespace,
    /// A literal chunk of an attribute name.
    AttrNamePart,
    /// `=`
    Equals,
    /// The opening `"` or `'` of an attribute value.
    AttrQuoteOpen,
    /// A literal chunk of a quoted attribute value.
    AttrValueText,
    /// The closing `"` or `'` of an attribute value.
    AttrQuoteClose,
    /// An unquoted attribute value.
    AttrValueUnquoted,
    /// A balanced JSX-style `{expr}` or `({expr})` in attribute position.
    JsxExpr,
    /// `>`
    TagClose,
    /// `/>`
    TagSelfClose,
    /// A zero-width recovery marker closing a malformed tag.
    SyntheticClose,

    /// End of file (zero-width).
    Eof,
}

impl TokenKind {
    /// Returns a human-readable name for this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::EscapedAt => "escaped '@'",
            TokenKind::EchoOpen => "'{{'",
            TokenKind::EchoContent => "echo content",
            TokenKind::EchoClose => "'}}'",
            TokenKind::RawEchoOpen => "'{!!'",
            TokenKind::RawEchoContent => "raw echo content",
            TokenKind::RawEchoClose => "'!!}'",
            TokenKind::TripleEchoOpen => "'{{{'",
            TokenKind::TripleEchoContent => "triple echo content",
            TokenKind::TripleEchoClose => "'}}}'",
            TokenKind::BladeComment => "blade comment",
            TokenKind::DirectiveName => "directive name",
            TokenKind::DirectiveArgs => "directive arguments",
            TokenKind::PhpContent => "php block content",
            TokenKind::VerbatimContent => "verbatim content",
            TokenKind::PhpTag => "php tag",
            TokenKind::PhpShortEcho => "php short echo",
            TokenKind::HtmlComment => "html comment",
            TokenKind::ConditionalComment => "conditional comment",
            TokenKind::Cdata => "cdata section",
            TokenKind::Doctype => "doctype",
            TokenKind::ProcessingInstruction => "processing instruction",
            TokenKind::BogusComment => "bogus comment",
            TokenKind::TagOpen => "'<'",
            TokenKind::CloseTagOpen => "'</'",
            TokenKind::TagNamePart => "tag name",
            TokenKind::TagWhitespace => "tag whitespace",
            TokenKind::AttrNamePart => "attribute name",
            TokenKind::Equals => "'='",
            TokenKind::AttrQuoteOpen => "opening quote",
            TokenKind::AttrValueText => "attribute value",
            TokenKind::AttrQuoteClose => "closing quote",
            TokenKind::AttrValueUnquoted => "unquoted attribute value",
            TokenKind::JsxExpr => "jsx expression",
            TokenKind::TagClose => "'>'",
            TokenKind::TagSelfClose => "'/>'",
            TokenKind::SyntheticClose => "synthetic close",
            TokenKind::Eof => "end of file",
        }
    }

    /// Returns true for the zero-width marker kinds that carry no bytes.
    pub fn is_zero_width(&self) -> bool {
        matches!(self, TokenKind::SyntheticClose | TokenKind::Eof)
    }
}
