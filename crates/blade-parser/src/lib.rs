//! Lossless Blade template parser.
//!
//! This crate provides a complete parser for Blade-style hybrid templates:
//! - Multi-mode lexer covering markup, directives, echoes, embedded PHP,
//!   comments and JSX-style attribute expressions
//! - Tree builder pairing directive blocks and HTML elements
//! - Arena node model with byte spans, so `render(parse(s)) == s`
//! - Error recovery for malformed input; parsing never fails
//!
//! # Example
//!
//! ```
//! use blade_parser::parse;
//!
//! let source = "@if($user)\n    <p>Hi {{ $user->name }}</p>\n@endif\n";
//! let result = parse(source);
//!
//! assert!(result.errors.is_empty());
//! assert_eq!(result.document.render(), source);
//! ```

mod ast;
mod directives;
mod error;
mod lexer;
mod parser;
mod token;

pub use ast::*;
pub use directives::{block_spec, BlockSpec, DirectiveRegistry};
pub use error::{LexDiagnostic, LexState, ParseError, ParseErrorKind};
pub use lexer::tokenize;
pub use source_span::{ByteOffset, LineCol, LineIndex, LineSpan, Span};
pub use token::{Token, TokenKind};

/// Options for parsing Blade templates.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Which names are treated as directives when prefixed with `@`.
    pub registry: DirectiveRegistry,
}

/// The result of parsing a Blade template.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed document.
    pub document: Document,
    /// Non-fatal problems recorded by the lexer.
    pub diagnostics: Vec<LexDiagnostic>,
    /// Structural problems recorded by the tree builder.
    pub errors: Vec<ParseError>,
}

/// Parses a Blade template with the core directive set.
///
/// Parsing always succeeds; malformed input degrades to text nodes and is
/// reported through [`ParseResult::diagnostics`] and [`ParseResult::errors`].
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default())
}

/// Parses a Blade template with custom options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult {
    let (tokens, diagnostics) = lexer::tokenize(source, &options.registry);
    let (document, errors) = parser::build(source, tokens);
    ParseResult {
        document,
        diagnostics,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.document.roots().is_empty());
    }

    #[test]
    fn test_parse_simple_element() {
        let result = parse("<div>hello</div>");
        assert!(result.errors.is_empty());
        assert_eq!(result.document.roots().len(), 1);
        let root = result.document.roots()[0];
        assert!(result.document.is_element(root));
        assert_eq!(result.document.children(root).len(), 1);
    }

    #[test]
    fn test_if_block_has_four_children() {
        let result = parse("@if($a) a @elseif($b) b @else c @endif");
        let doc = &result.document;
        assert_eq!(doc.roots().len(), 1);
        let block = doc.roots()[0];
        assert!(doc.is_directive_block(block));
        assert_eq!(doc.children(block).len(), 4);
        // Branch content hangs off the branch directives.
        let opener = doc.children(block)[0];
        assert_eq!(doc.as_directive(opener).unwrap().name, "if");
        assert_eq!(doc.children(opener).len(), 1);
        let closer = doc.children(block)[3];
        assert_eq!(doc.as_directive(closer).unwrap().lowered_name(), "endif");
        assert!(doc.children(closer).is_empty());
    }

    #[test]
    fn test_standalone_directive_without_closer() {
        let result = parse("@if($a) unclosed");
        let doc = &result.document;
        let first = doc.roots()[0];
        assert!(doc.is_directive(first));
        assert_eq!(
            doc.as_directive(first).unwrap().role,
            DirectiveRole::Standalone
        );
    }

    #[test]
    fn test_discovered_custom_block() {
        let result = parse("@datetime($x) y @enddatetime");
        let doc = &result.document;
        assert!(doc.is_directive_block(doc.roots()[0]));
    }

    #[test]
    fn test_nested_same_name_blocks() {
        let result = parse("@if($a) @if($b) x @endif y @endif");
        let doc = &result.document;
        assert_eq!(doc.roots().len(), 1);
        let outer = doc.roots()[0];
        let opener = doc.children(outer)[0];
        // The inner block lives inside the outer opener's branch.
        let inner = doc
            .children(opener)
            .iter()
            .copied()
            .find(|&id| doc.is_directive_block(id));
        assert!(inner.is_some());
    }

    #[test]
    fn test_unmatched_closing_tag_becomes_text() {
        let result = parse("a</div>b");
        let doc = &result.document;
        assert_eq!(doc.roots().len(), 3);
        assert_eq!(doc.as_text(doc.roots()[1]), Some("</div>"));
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::UnmatchedClosingTag { .. }
        ));
    }

    #[test]
    fn test_implicit_close() {
        let result = parse("<ul><li>one</ul>");
        let doc = &result.document;
        assert_eq!(doc.roots().len(), 1);
        let ul = doc.roots()[0];
        let li = doc.children(ul)[0];
        assert!(doc.as_element(li).unwrap().synthetic_close);
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::ImplicitlyClosedTag { .. }
        ));
        assert_eq!(doc.render(), "<ul><li>one</ul>");
    }

    #[test]
    fn test_void_element_takes_no_children() {
        let result = parse("<br>text");
        let doc = &result.document;
        assert_eq!(doc.roots().len(), 2);
        assert!(doc.as_element(doc.roots()[0]).unwrap().void);
    }

    #[test]
    fn test_case_insensitive_tag_matching() {
        let result = parse("<DIV>x</div>");
        assert!(result.errors.is_empty());
        assert_eq!(result.document.render(), "<DIV>x</div>");
    }

    #[test]
    fn test_block_spans_tile() {
        let source = "@if($a) one @else two @endif";
        let result = parse(source);
        let doc = &result.document;
        let block = doc.roots()[0];
        let children = doc.children(block);
        let block_span = doc.span(block).unwrap();
        assert_eq!(u32::from(block_span.start), 0);
        assert_eq!(u32::from(block_span.end), source.len() as u32);
        // Sibling spans tile the block exactly.
        let mut cursor = block_span.start;
        for &child in children {
            let span = doc.span(child).unwrap();
            assert_eq!(span.start, cursor);
            cursor = span.end;
        }
        assert_eq!(cursor, block_span.end);
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = DirectiveRegistry::empty();
        registry.register("greet");
        let result = parse_with_options(
            "@greet($n) @if($x)",
            ParseOptions { registry },
        );
        let doc = &result.document;
        assert!(doc.is_directive(doc.roots()[0]));
        // `@if` is not registered here, so it stays text.
        assert!(doc.roots()[1..].iter().all(|&id| doc.is_text(id)));
    }
}
