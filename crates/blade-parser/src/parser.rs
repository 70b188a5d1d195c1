//! Tree builder: turns the flat token stream into a [`Document`].
//!
//! Runs in two passes per nesting scope. Nodes are first collected into a
//! flat sibling list; when the scope closes (a closing tag or end of input)
//! directive openers and closers in that list are paired into
//! [`NodeKind::DirectiveBlock`] nodes. Element nesting itself is handled by
//! an open-element stack with HTML-style recovery: unclosed elements are
//! closed implicitly, unmatched closing tags degrade to text.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_span::Span;

use crate::ast::{
    is_void_element, render_parts, AttrKind, AttrValue, Attribute, BladeComment, Cdata, Comment,
    Directive, DirectiveRole, Document, Echo, EchoKind, Element, NodeId, NodeKind, Part, PhpBlock,
    PhpTag, PhpTagKind, Quote, Verbatim,
};
use crate::directives::block_spec;
use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Token, TokenKind};

/// Builds a document from a token stream.
pub(crate) fn build(source: &str, tokens: Vec<Token>) -> (Document, Vec<ParseError>) {
    let mut builder = Builder {
        source,
        tokens,
        pos: 0,
        doc: Document::new(source),
        stack: Vec::new(),
        roots: Vec::new(),
        errors: Vec::new(),
    };
    builder.run();
    let Builder {
        mut doc,
        roots,
        errors,
        ..
    } = builder;
    let roots = pair_directive_blocks(&mut doc, roots);
    doc.set_roots(roots);
    (doc, errors)
}

/// An element whose closing tag has not been seen yet.
struct OpenElement {
    id: NodeId,
    /// Lowercased rendered tag name, for case-insensitive matching.
    name: String,
    children: Vec<NodeId>,
}

struct Builder<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    doc: Document,
    stack: Vec<OpenElement>,
    roots: Vec<NodeId>,
    errors: Vec<ParseError>,
}

impl<'a> Builder<'a> {
    fn run(&mut self) {
        while self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Text => {
                    self.pos += 1;
                    let id = self.doc.alloc_spanned(
                        NodeKind::Text(token.text(self.source).to_string()),
                        token.span,
                    );
                    self.push_node(id);
                }
                TokenKind::EscapedAt => {
                    self.pos += 1;
                    let id = self.doc.alloc_spanned(NodeKind::Escape, token.span);
                    self.push_node(id);
                }
                TokenKind::EchoOpen | TokenKind::RawEchoOpen | TokenKind::TripleEchoOpen => {
                    let (echo, span) = self.read_echo();
                    let id = self.doc.alloc_spanned(NodeKind::Echo(echo), span);
                    self.push_node(id);
                }
                TokenKind::BladeComment => {
                    self.pos += 1;
                    let raw = token.text(self.source);
                    let closed = raw.len() >= 8 && raw.ends_with("--}}");
                    let content = strip_delims(raw, 4, 4, closed);
                    let id = self.doc.alloc_spanned(
                        NodeKind::BladeComment(BladeComment { content, closed }),
                        token.span,
                    );
                    self.push_node(id);
                }
                TokenKind::HtmlComment => {
                    self.pos += 1;
                    let raw = token.text(self.source);
                    let closed = raw.len() >= 7 && raw.ends_with("-->");
                    let content = strip_delims(raw, 4, 3, closed);
                    let id = self.doc.alloc_spanned(
                        NodeKind::Comment(Comment { content, closed }),
                        token.span,
                    );
                    self.push_node(id);
                }
                TokenKind::Cdata => {
                    self.pos += 1;
                    let raw = token.text(self.source);
                    let closed = raw.len() >= 12 && raw.ends_with("]]>");
                    let content = strip_delims(raw, 9, 3, closed);
                    let id = self
                        .doc
                        .alloc_spanned(NodeKind::Cdata(Cdata { content, closed }), token.span);
                    self.push_node(id);
                }
                TokenKind::ConditionalComment => {
                    self.raw_node(token, NodeKind::ConditionalComment)
                }
                TokenKind::Doctype => self.raw_node(token, NodeKind::Doctype),
                TokenKind::ProcessingInstruction => {
                    self.raw_node(token, NodeKind::ProcessingInstruction)
                }
                TokenKind::BogusComment => self.raw_node(token, NodeKind::BogusComment),
                TokenKind::PhpTag => self.php_tag(token, PhpTagKind::Full),
                TokenKind::PhpShortEcho => self.php_tag(token, PhpTagKind::ShortEcho),
                TokenKind::DirectiveName => {
                    let raw = token.text(self.source);
                    let name = &raw[1..];
                    if name.eq_ignore_ascii_case("php") && !self.next_is(TokenKind::DirectiveArgs)
                    {
                        self.php_block(token);
                    } else if name.eq_ignore_ascii_case("verbatim")
                        && !self.next_is(TokenKind::DirectiveArgs)
                    {
                        self.verbatim(token);
                    } else {
                        let (directive, span) = self.read_directive();
                        let id = self
                            .doc
                            .alloc_spanned(NodeKind::Directive(directive), span);
                        self.push_node(id);
                    }
                }
                TokenKind::TagOpen => self.parse_open_tag(token),
                TokenKind::CloseTagOpen => self.parse_close_tag(token),
                // Stray structural tokens are covered by the constructs
                // above; skipping keeps the builder total.
                _ => self.pos += 1,
            }
        }

        let end: source_span::ByteOffset = (self.source.len() as u32).into();
        while let Some(open) = self.stack.pop() {
            let span = self.doc.span(open.id).unwrap_or_default();
            self.errors.push(ParseError::new(
                ParseErrorKind::UnclosedTag {
                    tag_name: open.name.clone(),
                },
                span,
            ));
            self.close_element(open, end, None, true);
        }
    }

    fn push_node(&mut self, id: NodeId) {
        match self.stack.last_mut() {
            Some(open) => open.children.push(id),
            None => self.roots.push(id),
        }
    }

    fn next_is(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos + 1).map(|t| t.kind) == Some(kind)
    }

    fn raw_node(&mut self, token: Token, make: fn(String) -> NodeKind) {
        self.pos += 1;
        let id = self
            .doc
            .alloc_spanned(make(token.text(self.source).to_string()), token.span);
        self.push_node(id);
    }

    fn php_tag(&mut self, token: Token, kind: PhpTagKind) {
        self.pos += 1;
        let raw = token.text(self.source);
        let open_len = match kind {
            PhpTagKind::Full => 5,
            PhpTagKind::ShortEcho => 3,
        };
        let closed = raw.len() >= open_len + 2 && raw.ends_with("?>");
        let content = strip_delims(raw, open_len, 2, closed);
        let id = self.doc.alloc_spanned(
            NodeKind::PhpTag(PhpTag {
                kind,
                content,
                closed,
            }),
            token.span,
        );
        self.push_node(id);
    }

    fn php_block(&mut self, open: Token) {
        self.pos += 1;
        let open_raw = open.text(self.source).to_string();
        let mut end = open.span.end;
        let mut content = String::new();
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind == TokenKind::PhpContent {
                content = token.text(self.source).to_string();
                end = token.span.end;
                self.pos += 1;
            }
        }
        let mut close_raw = None;
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind == TokenKind::DirectiveName
                && token.text(self.source)[1..].eq_ignore_ascii_case("endphp")
            {
                close_raw = Some(token.text(self.source).to_string());
                end = token.span.end;
                self.pos += 1;
            }
        }
        let id = self.doc.alloc_spanned(
            NodeKind::PhpBlock(PhpBlock {
                content,
                open_raw,
                close_raw,
            }),
            Span {
                start: open.span.start,
                end,
            },
        );
        self.push_node(id);
    }

    fn verbatim(&mut self, open: Token) {
        self.pos += 1;
        let open_raw = open.text(self.source).to_string();
        let mut end = open.span.end;
        let mut content = String::new();
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind == TokenKind::VerbatimContent {
                content = token.text(self.source).to_string();
                end = token.span.end;
                self.pos += 1;
            }
        }
        let mut close_raw = None;
        if let Some(token) = self.tokens.get(self.pos) {
            if token.kind == TokenKind::DirectiveName
                && token.text(self.source)[1..].eq_ignore_ascii_case("endverbatim")
            {
                close_raw = Some(token.text(self.source).to_string());
                end = token.span.end;
                self.pos += 1;
            }
        }
        let id = self.doc.alloc_spanned(
            NodeKind::Verbatim(Verbatim {
                content,
                open_raw,
                close_raw,
            }),
            Span {
                start: open.span.start,
                end,
            },
        );
        self.push_node(id);
    }

    /// Reads `DirectiveName [DirectiveArgs]` into a directive head.
    fn read_directive(&mut self) -> (Directive, Span) {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        let raw = token.text(self.source);
        let name = SmolStr::new(&raw[1..]);
        let mut span = token.span;
        let mut whitespace_before_args = String::new();
        let mut arguments = None;
        if let Some(args) = self.tokens.get(self.pos) {
            if args.kind == TokenKind::DirectiveArgs {
                let text = args.text(self.source);
                let paren = text.find('(').unwrap_or(0);
                whitespace_before_args = text[..paren].to_string();
                arguments = Some(text[paren..].to_string());
                span.end = args.span.end;
                self.pos += 1;
            }
        }
        (
            Directive {
                name,
                whitespace_before_args,
                arguments,
                role: DirectiveRole::Standalone,
            },
            span,
        )
    }

    /// Reads an `Open [Content] Close` echo token triple.
    fn read_echo(&mut self) -> (Echo, Span) {
        let open = self.tokens[self.pos].clone();
        self.pos += 1;
        let kind = match open.kind {
            TokenKind::RawEchoOpen => EchoKind::Raw,
            TokenKind::TripleEchoOpen => EchoKind::Triple,
            _ => EchoKind::Regular,
        };
        let mut span = open.span;
        let mut content = String::new();
        if let Some(token) = self.tokens.get(self.pos) {
            if matches!(
                token.kind,
                TokenKind::EchoContent | TokenKind::RawEchoContent | TokenKind::TripleEchoContent
            ) {
                content = token.text(self.source).to_string();
                self.pos += 1;
            }
        }
        if let Some(token) = self.tokens.get(self.pos) {
            if matches!(
                token.kind,
                TokenKind::EchoClose | TokenKind::RawEchoClose | TokenKind::TripleEchoClose
            ) {
                span.end = token.span.end;
                self.pos += 1;
            }
        }
        (Echo { kind, content }, span)
    }

    /// Reads the parts of a composite name or value position.
    fn read_part(&mut self, literal_kinds: &[TokenKind]) -> Option<Part> {
        let token = self.tokens.get(self.pos)?.clone();
        if literal_kinds.contains(&token.kind) {
            self.pos += 1;
            return Some(Part::Literal(token.text(self.source).to_string()));
        }
        match token.kind {
            TokenKind::EscapedAt => {
                self.pos += 1;
                Some(Part::Literal("@".to_string()))
            }
            TokenKind::EchoOpen | TokenKind::RawEchoOpen | TokenKind::TripleEchoOpen => {
                let (echo, _) = self.read_echo();
                Some(Part::Echo(echo))
            }
            TokenKind::DirectiveName => {
                let (directive, _) = self.read_directive();
                Some(Part::Directive(directive))
            }
            _ => None,
        }
    }

    fn parse_open_tag(&mut self, open: Token) {
        self.pos += 1;

        let mut tag_name = Vec::new();
        while let Some(part) = self.read_part(&[TokenKind::TagNamePart]) {
            tag_name.push(part);
        }

        let mut attributes = Vec::new();
        let mut pending_ws = String::new();
        let (self_closing, synthetic_close, end) = loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                break (false, true, open.span.end);
            };
            match token.kind {
                TokenKind::TagWhitespace => {
                    self.pos += 1;
                    pending_ws.push_str(token.text(self.source));
                }
                TokenKind::TagClose => {
                    self.pos += 1;
                    break (false, false, token.span.end);
                }
                TokenKind::TagSelfClose => {
                    self.pos += 1;
                    break (true, false, token.span.end);
                }
                TokenKind::SyntheticClose | TokenKind::Eof => {
                    if token.kind == TokenKind::SyntheticClose {
                        self.pos += 1;
                    }
                    break (false, true, token.span.end);
                }
                TokenKind::JsxExpr => {
                    self.pos += 1;
                    let raw = token.text(self.source).to_string();
                    let kind = if jsx_is_spread(&raw) {
                        AttrKind::Spread
                    } else {
                        AttrKind::Shorthand
                    };
                    attributes.push(Attribute {
                        leading: std::mem::take(&mut pending_ws),
                        name: vec![Part::Literal(raw)],
                        before_eq: String::new(),
                        after_eq: String::new(),
                        value: None,
                        kind,
                    });
                }
                _ => {
                    if let Some(attr) = self.parse_attribute(&mut pending_ws) {
                        attributes.push(attr);
                    } else {
                        // Unexpected token; drop it rather than loop.
                        self.pos += 1;
                    }
                }
            }
        };

        let rendered = render_parts(&tag_name);
        let lower = rendered.to_ascii_lowercase();
        let composite = tag_name
            .iter()
            .any(|p| !matches!(p, Part::Literal(_)));
        let void = !composite && is_void_element(&lower);
        let element = Element {
            tag_name,
            attributes,
            ws_before_close: pending_ws,
            self_closing,
            void,
            synthetic_close,
            close_raw: None,
        };
        let id = self.doc.alloc_spanned(
            NodeKind::Element(element),
            Span {
                start: open.span.start,
                end,
            },
        );
        if self_closing || void || synthetic_close {
            self.push_node(id);
        } else {
            self.stack.push(OpenElement {
                id,
                name: lower,
                children: Vec::new(),
            });
        }
    }

    fn parse_attribute(&mut self, pending_ws: &mut String) -> Option<Attribute> {
        let mut name = Vec::new();
        while let Some(part) = self.read_part(&[TokenKind::AttrNamePart]) {
            name.push(part);
        }
        if name.is_empty() {
            return None;
        }
        let leading = std::mem::take(pending_ws);

        // Whitespace before `=` belongs to the attribute only when an `=`
        // actually follows.
        let mut before_eq = String::new();
        if let Some(ws) = self.tokens.get(self.pos) {
            if ws.kind == TokenKind::TagWhitespace
                && self.tokens.get(self.pos + 1).map(|t| t.kind) == Some(TokenKind::Equals)
            {
                before_eq = ws.text(self.source).to_string();
                self.pos += 1;
            }
        }
        let has_eq = self.tokens.get(self.pos).map(|t| t.kind) == Some(TokenKind::Equals);

        let name_text = render_parts(&name);
        let mut kind = if name_text.starts_with("::") {
            AttrKind::Escaped
        } else if name_text.starts_with(':') {
            AttrKind::Bound
        } else {
            AttrKind::Plain
        };

        if !has_eq {
            return Some(Attribute {
                leading,
                name,
                before_eq: String::new(),
                after_eq: String::new(),
                value: None,
                kind,
            });
        }
        self.pos += 1; // `=`

        let mut after_eq = String::new();
        if let Some(ws) = self.tokens.get(self.pos) {
            if ws.kind == TokenKind::TagWhitespace {
                after_eq = ws.text(self.source).to_string();
                self.pos += 1;
            }
        }

        let value = match self.tokens.get(self.pos).map(|t| t.kind) {
            Some(TokenKind::AttrQuoteOpen) => {
                let quote_token = self.tokens[self.pos].clone();
                self.pos += 1;
                let quote = if quote_token.text(self.source) == "\"" {
                    Quote::Double
                } else {
                    Quote::Single
                };
                let mut parts = Vec::new();
                while let Some(part) = self.read_part(&[TokenKind::AttrValueText]) {
                    parts.push(part);
                }
                if self.tokens.get(self.pos).map(|t| t.kind) == Some(TokenKind::AttrQuoteClose) {
                    self.pos += 1;
                }
                Some(AttrValue { quote, parts })
            }
            Some(TokenKind::JsxExpr) => {
                let token = self.tokens[self.pos].clone();
                self.pos += 1;
                kind = AttrKind::JsxExpr;
                Some(AttrValue {
                    quote: Quote::Unquoted,
                    parts: vec![Part::Literal(token.text(self.source).to_string())],
                })
            }
            _ => {
                let mut parts = Vec::new();
                while let Some(part) = self.read_part(&[TokenKind::AttrValueUnquoted]) {
                    parts.push(part);
                }
                if parts.is_empty() {
                    None
                } else {
                    Some(AttrValue {
                        quote: Quote::Unquoted,
                        parts,
                    })
                }
            }
        };

        Some(Attribute {
            leading,
            name,
            before_eq,
            after_eq,
            value,
            kind,
        })
    }

    fn parse_close_tag(&mut self, open: Token) {
        self.pos += 1;
        let mut name = Vec::new();
        while let Some(part) = self.read_part(&[TokenKind::TagNamePart]) {
            name.push(part);
        }
        let mut end = open.span.end;
        loop {
            let Some(token) = self.tokens.get(self.pos).cloned() else {
                break;
            };
            match token.kind {
                TokenKind::TagWhitespace => {
                    self.pos += 1;
                    end = token.span.end;
                }
                TokenKind::TagClose | TokenKind::SyntheticClose => {
                    self.pos += 1;
                    end = token.span.end;
                    break;
                }
                _ => break,
            }
        }
        let span = Span {
            start: open.span.start,
            end,
        };
        let raw = span.slice(self.source).to_string();
        let lower = render_parts(&name).to_ascii_lowercase();

        let Some(index) = self.stack.iter().rposition(|o| o.name == lower) else {
            self.errors.push(ParseError::new(
                ParseErrorKind::UnmatchedClosingTag { tag_name: lower },
                span,
            ));
            let id = self.doc.alloc_spanned(NodeKind::Text(raw), span);
            self.push_node(id);
            return;
        };

        // Anything deeper than the match is closed implicitly.
        while self.stack.len() > index + 1 {
            let unclosed = self.stack.pop().unwrap();
            let unclosed_span = self.doc.span(unclosed.id).unwrap_or_default();
            self.errors.push(ParseError::new(
                ParseErrorKind::ImplicitlyClosedTag {
                    tag_name: unclosed.name.clone(),
                },
                unclosed_span,
            ));
            self.close_element(unclosed, span.start, None, true);
        }
        let matched = self.stack.pop().unwrap();
        self.close_element(matched, span.end, Some(raw), false);
    }

    /// Pairs the element's collected children, attaches them, extends the
    /// span over the content and closing tag, and emplaces it as a sibling.
    fn close_element(
        &mut self,
        open: OpenElement,
        span_end: source_span::ByteOffset,
        close_raw: Option<String>,
        synthetic: bool,
    ) {
        let children = pair_directive_blocks(&mut self.doc, open.children);
        self.doc.adopt_children(open.id, children);
        if let Some(span) = self.doc.span(open.id) {
            self.doc.set_span(
                open.id,
                Span {
                    start: span.start,
                    end: span_end,
                },
            );
        }
        if let NodeKind::Element(element) = self.doc.kind_mut_raw(open.id) {
            element.close_raw = close_raw;
            if synthetic {
                element.synthetic_close = true;
            }
        }
        self.push_node(open.id);
    }
}

fn strip_delims(raw: &str, open: usize, close: usize, closed: bool) -> String {
    let body = &raw[open..];
    if closed {
        body[..body.len() - close].to_string()
    } else {
        body.to_string()
    }
}

fn jsx_is_spread(raw: &str) -> bool {
    raw.strip_prefix('{')
        .map(|r| r.trim_start().starts_with("..."))
        .unwrap_or(false)
}

/// A directive block being assembled while scanning a sibling list.
struct OpenBlock {
    intermediates: Vec<String>,
    closers: Vec<String>,
    /// Each branch directive with the content nodes it owns.
    branches: Vec<(NodeId, Vec<NodeId>)>,
}

/// Pairs `@opener ... @closer` runs in a flat sibling list into
/// `DirectiveBlock` nodes. Known grammar comes from the block table;
/// unknown `@xxx ... @endxxx` pairs are discovered, either way an opener
/// only opens when a matching closer actually follows among the remaining
/// siblings (counting nested same-name openers).
pub(crate) fn pair_directive_blocks(doc: &mut Document, list: Vec<NodeId>) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = Vec::new();
    let mut blocks: Vec<OpenBlock> = Vec::new();
    let matched = match_openers(doc, &list);

    for (i, &id) in list.iter().enumerate() {
        let Some(lname) = doc.as_directive(id).map(|d| d.lowered_name()) else {
            push_to(&mut blocks, &mut out, id);
            continue;
        };

        let closes_top = blocks
            .last()
            .is_some_and(|top| top.closers.contains(&lname));
        if closes_top {
            let block = blocks.pop().unwrap();
            let block_id = finish_block(doc, block, id);
            push_to(&mut blocks, &mut out, block_id);
            continue;
        }

        let continues_top = blocks
            .last()
            .is_some_and(|top| top.intermediates.contains(&lname));
        if continues_top {
            blocks
                .last_mut()
                .unwrap()
                .branches
                .push((id, Vec::new()));
            continue;
        }

        if let Some((intermediates, closers)) = opener_candidate(&lname) {
            if matched[i] {
                blocks.push(OpenBlock {
                    intermediates,
                    closers,
                    branches: vec![(id, Vec::new())],
                });
                continue;
            }
        }

        push_to(&mut blocks, &mut out, id);
    }

    // Lookahead confirms closers before opening, so this only unwinds if
    // the list was mutated mid-pairing; flatten conservatively.
    while let Some(block) = blocks.pop() {
        let mut flat = Vec::new();
        for (directive, mut children) in block.branches {
            flat.push(directive);
            flat.append(&mut children);
        }
        for id in flat {
            push_to(&mut blocks, &mut out, id);
        }
    }

    out
}

fn push_to(blocks: &mut Vec<OpenBlock>, out: &mut Vec<NodeId>, id: NodeId) {
    match blocks.last_mut() {
        Some(block) => block.branches.last_mut().unwrap().1.push(id),
        None => out.push(id),
    }
}

/// The branch/closer grammar a directive name would open with: from the
/// block table when known, otherwise the discovered `end`-prefixed form.
fn opener_candidate(lname: &str) -> Option<(Vec<String>, Vec<String>)> {
    if let Some(spec) = block_spec(lname) {
        return Some((
            spec.intermediates.iter().map(|s| s.to_string()).collect(),
            spec.closers.iter().map(|s| s.to_string()).collect(),
        ));
    }
    if lname.starts_with("end") {
        return None;
    }
    Some((vec![format!("else{lname}")], vec![format!("end{lname}")]))
}

/// For each position in the sibling list, whether a directive there would
/// find its closer among the later siblings, counting nested same-name
/// openers so `@if @if @endif @endif` pairs outside-in.
///
/// Computed up front as one bracket-matching pass per distinct opener
/// name, touching only that name's own occurrences and its closers'.
fn match_openers(doc: &Document, list: &[NodeId]) -> Vec<bool> {
    let mut positions: FxHashMap<String, Vec<usize>> = FxHashMap::default();
    for (i, &id) in list.iter().enumerate() {
        if let Some(directive) = doc.as_directive(id) {
            positions
                .entry(directive.lowered_name())
                .or_default()
                .push(i);
        }
    }

    let mut matched = vec![false; list.len()];
    for (lname, openers) in &positions {
        let Some((_, closers)) = opener_candidate(lname) else {
            continue;
        };
        let mut events: Vec<(usize, bool)> = openers.iter().map(|&i| (i, false)).collect();
        for closer in &closers {
            if let Some(indices) = positions.get(closer) {
                events.extend(indices.iter().map(|&i| (i, true)));
            }
        }
        events.sort_unstable();
        let mut open: Vec<usize> = Vec::new();
        for (i, is_closer) in events {
            if !is_closer {
                open.push(i);
            } else if let Some(opener) = open.pop() {
                matched[opener] = true;
            }
        }
    }
    matched
}

/// Assembles a completed block: assigns roles, hands each branch its
/// content, stretches branch spans to the next branch, and wraps everything
/// in a `DirectiveBlock` node.
fn finish_block(doc: &mut Document, block: OpenBlock, closer: NodeId) -> NodeId {
    let closer_span = doc.span(closer).unwrap_or_default();
    let mut directive_ids = Vec::with_capacity(block.branches.len() + 1);

    let branch_count = block.branches.len();
    let branch_starts: Vec<_> = block
        .branches
        .iter()
        .map(|(id, _)| doc.span(*id).unwrap_or_default().start)
        .collect();

    for (i, (directive_id, children)) in block.branches.into_iter().enumerate() {
        let branch_end = if i + 1 < branch_count {
            branch_starts[i + 1]
        } else {
            closer_span.start
        };
        let start = branch_starts[i];
        doc.adopt_children(directive_id, children);
        doc.set_span(
            directive_id,
            Span {
                start,
                end: branch_end,
            },
        );
        if let NodeKind::Directive(directive) = doc.kind_mut_raw(directive_id) {
            directive.role = if i == 0 {
                DirectiveRole::Opener
            } else {
                DirectiveRole::Intermediate
            };
        }
        directive_ids.push(directive_id);
    }

    if let NodeKind::Directive(directive) = doc.kind_mut_raw(closer) {
        directive.role = DirectiveRole::Closer;
    }
    directive_ids.push(closer);

    let start = branch_starts.first().copied().unwrap_or(closer_span.start);
    let block_id = doc.alloc_spanned(
        NodeKind::DirectiveBlock,
        Span {
            start,
            end: closer_span.end,
        },
    );
    doc.adopt_children(block_id, directive_ids);
    block_id
}
