//! Blade template lexer.
//!
//! A single-pass, stateful byte scanner. The lexer is an explicit state
//! machine: markup modes live on a state stack (pushed when a nested mode
//! begins, popped when it completes), while bounded constructs (echoes,
//! comments, directive argument lists, PHP regions) are scanned to
//! completion by the per-concern modules and never suspend.
//!
//! Guarantees: tokens are emitted in strictly increasing order, never
//! overlap, and cover every input byte. Malformed input produces a
//! [`LexDiagnostic`] and degraded tokens, never a failure.

mod comments;
mod directives;
mod echoes;
mod jsx;
mod php;
mod rawtext;
mod tags;

use rustc_hash::FxHashMap;

use crate::directives::DirectiveRegistry;
use crate::error::{LexDiagnostic, LexState};
use crate::token::{Token, TokenKind};
use source_span::Span;

/// Tokenizes a Blade template.
///
/// The concatenation of the returned tokens' spans equals `source`; the
/// trailing `Eof` token is zero-width.
pub fn tokenize(source: &str, registry: &DirectiveRegistry) -> (Vec<Token>, Vec<LexDiagnostic>) {
    let mut lexer = Lexer::new(source, registry);
    lexer.run();
    (lexer.tokens, lexer.diagnostics)
}

pub(crate) struct Lexer<'a> {
    pub(super) source: &'a str,
    pub(super) bytes: &'a [u8],
    pub(super) registry: &'a DirectiveRegistry,
    /// Current scan position.
    pub(super) pos: usize,
    /// Start of the pending literal chunk (text, tag name piece, ...).
    pub(super) chunk_start: usize,
    /// Token kind the pending chunk is flushed as; depends on the state.
    pub(super) chunk_kind: TokenKind,
    pub(super) tokens: Vec<Token>,
    pub(super) diagnostics: Vec<LexDiagnostic>,
    /// Explicit state stack for the markup modes.
    pub(super) states: Vec<LexState>,
    /// Quote byte of the attribute value being scanned.
    pub(super) quote: u8,
    /// Lowercased literal tag name of the tag being scanned.
    pub(super) tag_name: String,
    /// True when the tag name contains an echo or directive part.
    pub(super) tag_has_expr: bool,
    /// True when scanning a `</...>` tag.
    pub(super) tag_is_close: bool,
    /// Offset of the `<` of the tag being scanned, for diagnostics.
    pub(super) tag_open_pos: usize,
    /// Tag name whose closing tag ends the current rawtext region.
    pub(super) rawtext_closer: String,
    /// Lowercased `@word` occurrences in the raw source, mapped to the
    /// offsets of their first and last `@`. Built lazily the first time
    /// an unregistered name needs a discovery check.
    marker_index: Option<FxHashMap<String, (usize, usize)>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, registry: &'a DirectiveRegistry) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            registry,
            pos: 0,
            chunk_start: 0,
            chunk_kind: TokenKind::Text,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            states: Vec::new(),
            quote: b'"',
            tag_name: String::new(),
            tag_has_expr: false,
            tag_is_close: false,
            tag_open_pos: 0,
            rawtext_closer: String::new(),
            marker_index: None,
        }
    }

    fn run(&mut self) {
        self.states.push(LexState::Data);
        while self.pos < self.bytes.len() {
            match self.state() {
                LexState::Data => self.step_data(),
                LexState::RawText => self.step_rawtext(),
                LexState::TagName => self.step_tag_name(),
                LexState::BeforeAttrName => self.step_before_attr_name(),
                LexState::AttrName => self.step_attr_name(),
                LexState::AfterAttrName => self.step_after_attr_name(),
                LexState::BeforeAttrValue => self.step_before_attr_value(),
                LexState::AttrValueQuoted => self.step_attr_value_quoted(),
                LexState::AttrValueUnquoted => self.step_attr_value_unquoted(),
                // Bounded construct scanners never remain on the stack.
                _ => unreachable!("non-markup state on the lexer stack"),
            }
        }
        if self.in_tag() {
            self.fail_tag("unexpected end of input in tag");
        }
        self.flush_chunk(self.bytes.len());
        let end = self.bytes.len();
        self.emit(TokenKind::Eof, end, end);
    }

    // === State stack ===

    pub(super) fn state(&self) -> LexState {
        *self.states.last().expect("state stack is never empty")
    }

    pub(super) fn set_state(&mut self, state: LexState) {
        *self.states.last_mut().expect("state stack is never empty") = state;
    }

    pub(super) fn push_state(&mut self, state: LexState) {
        self.states.push(state);
    }

    pub(super) fn pop_state(&mut self) {
        self.states.pop();
        if self.states.is_empty() {
            self.states.push(LexState::Data);
        }
    }

    pub(super) fn in_tag(&self) -> bool {
        matches!(
            self.state(),
            LexState::TagName
                | LexState::BeforeAttrName
                | LexState::AttrName
                | LexState::AfterAttrName
                | LexState::BeforeAttrValue
                | LexState::AttrValueQuoted
                | LexState::AttrValueUnquoted
        )
    }

    // === Emission ===

    pub(super) fn emit(&mut self, kind: TokenKind, start: usize, end: usize) {
        debug_assert!(start <= end);
        self.tokens
            .push(Token::new(kind, Span::new(start as u32, end as u32)));
    }

    /// Flushes the pending literal chunk up to `end` using the state's
    /// chunk kind.
    pub(super) fn flush_chunk(&mut self, end: usize) {
        if self.chunk_start < end {
            let kind = self.chunk_kind;
            self.emit(kind, self.chunk_start, end);
        }
        self.chunk_start = end;
    }

    pub(super) fn diagnostic(&mut self, state: LexState, reason: &'static str, offset: usize) {
        self.diagnostics
            .push(LexDiagnostic::new(state, reason, offset as u32));
    }

    /// Returns true if `self.bytes[pos..]` starts with `prefix`.
    pub(super) fn starts_with(&self, pos: usize, prefix: &[u8]) -> bool {
        self.bytes[pos..].starts_with(prefix)
    }

    /// Case-insensitive variant of [`Self::starts_with`].
    pub(super) fn starts_with_ci(&self, pos: usize, prefix: &[u8]) -> bool {
        self.bytes
            .get(pos..pos + prefix.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(prefix))
    }

    // === Data state ===

    /// Fast path: skip ahead to the next byte that could start a construct,
    /// then disambiguate at that candidate only.
    fn step_data(&mut self) {
        let Some(offset) = self.bytes[self.pos..]
            .iter()
            .position(|b| matches!(b, b'{' | b'<' | b'@'))
        else {
            self.pos = self.bytes.len();
            return;
        };
        let candidate = self.pos + offset;
        self.pos = candidate;
        let consumed = match self.bytes[candidate] {
            b'@' => self.try_at_construct(true),
            b'{' => self.try_brace_construct(),
            b'<' => self.try_angle_construct(),
            _ => unreachable!(),
        };
        if !consumed {
            // Ordinary character; it stays in the pending text run.
            self.pos = candidate + 1;
        }
    }

    /// Handles `@` in any content position: escapes, directives and the
    /// hard-wired `@php`/`@verbatim` mode switches.
    ///
    /// `allow_region_blocks` is false inside tags, where `@php`/`@verbatim`
    /// are ordinary directives rather than mode switches.
    pub(super) fn try_at_construct(&mut self, allow_region_blocks: bool) -> bool {
        let at = self.pos;
        let after = at + 1;

        // Escapes: `@` immediately before `{{`, `{!!`, `{{{` or another `@`
        // produces a literal `@`; the opener bytes join the next chunk.
        let suppressed = if self.starts_with(after, b"{{{") {
            3
        } else if self.starts_with(after, b"{{") {
            2
        } else if self.starts_with(after, b"{!!") {
            3
        } else if self.starts_with(after, b"@") {
            1
        } else {
            0
        };
        if suppressed > 0 {
            self.flush_chunk(at);
            self.emit(TokenKind::EscapedAt, at, after);
            self.chunk_start = after;
            self.pos = after + suppressed;
            return true;
        }

        let name_end = self.scan_directive_name(after);
        if name_end == after {
            return false;
        }
        let name = &self.source[after..name_end];

        if allow_region_blocks && name.eq_ignore_ascii_case("php") && !self.args_follow(name_end) {
            directives::lex_php_block(self, at, name_end);
            return true;
        }
        if allow_region_blocks && name.eq_ignore_ascii_case("verbatim") {
            directives::lex_verbatim(self, at, name_end);
            return true;
        }
        if !self.registry.is_directive(name) {
            let lowered = name.to_ascii_lowercase();
            if !self.is_discovered(&lowered, at) {
                return false;
            }
        }

        self.flush_chunk(at);
        self.emit(TokenKind::DirectiveName, at, name_end);
        self.pos = name_end;
        self.chunk_start = name_end;
        directives::try_lex_args(self);
        true
    }

    /// Scans a directive name (`[A-Za-z0-9_]+`) and returns the end offset.
    pub(super) fn scan_directive_name(&self, start: usize) -> usize {
        let mut end = start;
        while end < self.bytes.len()
            && (self.bytes[end].is_ascii_alphanumeric() || self.bytes[end] == b'_')
        {
            end += 1;
        }
        end
    }

    /// Decides whether an unregistered name still lexes as a directive.
    ///
    /// Custom blocks are discovered from the raw source: `@xxx` counts
    /// when a matching `@endxxx` occurs later, and an `@endxxx` or
    /// `@elsexxx` counts when its base `@xxx` occurred earlier. A lone
    /// word after `@`, like an email domain, matches neither and stays
    /// text. The check is byte-level and does not consult enclosing
    /// constructs; the tree builder leaves a name standalone when its
    /// counterpart turns out not to be a sibling directive.
    fn is_discovered(&mut self, lname: &str, at: usize) -> bool {
        if let Some(base) = lname.strip_prefix("end") {
            if !base.is_empty() && self.marker_before(base, at) {
                return true;
            }
        }
        if let Some(base) = lname.strip_prefix("else") {
            if !base.is_empty() && self.marker_before(base, at) {
                return true;
            }
        }
        self.marker_after(&format!("end{lname}"), at)
    }

    fn marker_before(&mut self, name: &str, at: usize) -> bool {
        self.marker_index()
            .get(name)
            .is_some_and(|&(first, _)| first < at)
    }

    fn marker_after(&mut self, name: &str, at: usize) -> bool {
        self.marker_index()
            .get(name)
            .is_some_and(|&(_, last)| last > at)
    }

    fn marker_index(&mut self) -> &FxHashMap<String, (usize, usize)> {
        if self.marker_index.is_none() {
            let mut index: FxHashMap<String, (usize, usize)> = FxHashMap::default();
            let mut pos = 0;
            while pos < self.bytes.len() {
                let Some(found) = self.bytes[pos..].iter().position(|&b| b == b'@') else {
                    break;
                };
                let at = pos + found;
                let name_end = self.scan_directive_name(at + 1);
                if name_end > at + 1 {
                    let name = self.source[at + 1..name_end].to_ascii_lowercase();
                    index
                        .entry(name)
                        .and_modify(|(_, last)| *last = at)
                        .or_insert((at, at));
                }
                pos = at + 1;
            }
            self.marker_index = Some(index);
        }
        self.marker_index.as_ref().unwrap()
    }

    /// Returns true if an argument list opens right after a directive name.
    fn args_follow(&self, name_end: usize) -> bool {
        let mut pos = name_end;
        while pos < self.bytes.len() && matches!(self.bytes[pos], b' ' | b'\t') {
            pos += 1;
        }
        self.bytes.get(pos) == Some(&b'(')
    }

    /// Handles `{` in any content position. Checks, in order: comment
    /// opener, triple echo, plain echo, raw echo.
    pub(super) fn try_brace_construct(&mut self) -> bool {
        let at = self.pos;
        if self.starts_with(at, b"{{--") {
            comments::lex_blade_comment(self, at);
            true
        } else if self.starts_with(at, b"{{{") {
            echoes::lex_echo(self, at, echoes::EchoDelims::TRIPLE);
            true
        } else if self.starts_with(at, b"{{") {
            echoes::lex_echo(self, at, echoes::EchoDelims::REGULAR);
            true
        } else if self.starts_with(at, b"{!!") {
            echoes::lex_echo(self, at, echoes::EchoDelims::RAW);
            true
        } else {
            false
        }
    }

    /// Handles `<` in data position: markup declarations, PHP tags,
    /// processing instructions, and open/close tags.
    fn try_angle_construct(&mut self) -> bool {
        let at = self.pos;
        if self.starts_with(at, b"<!--") {
            if self.starts_with_ci(at, b"<!--[if") {
                comments::lex_conditional_comment(self, at);
            } else {
                comments::lex_html_comment(self, at);
            }
            return true;
        }
        if self.starts_with(at, b"<![CDATA[") {
            comments::lex_cdata(self, at);
            return true;
        }
        if self.starts_with_ci(at, b"<!doctype") {
            comments::lex_doctype(self, at);
            return true;
        }
        if self.starts_with(at, b"<!") {
            comments::lex_bogus_comment(self, at);
            return true;
        }
        if self.starts_with(at, b"<?=") {
            php::lex_php_tag(self, at, TokenKind::PhpShortEcho);
            return true;
        }
        if self.starts_with_ci(at, b"<?php") && self.php_tag_boundary(at + 5) {
            php::lex_php_tag(self, at, TokenKind::PhpTag);
            return true;
        }
        if self.starts_with(at, b"<?") {
            comments::lex_processing_instruction(self, at);
            return true;
        }
        if self.starts_with(at, b"</") && self.tag_name_can_start(at + 2) {
            self.flush_chunk(at);
            self.emit(TokenKind::CloseTagOpen, at, at + 2);
            self.begin_tag(at, true);
            self.pos = at + 2;
            self.chunk_start = self.pos;
            return true;
        }
        if self.tag_name_can_start(at + 1) {
            self.flush_chunk(at);
            self.emit(TokenKind::TagOpen, at, at + 1);
            self.begin_tag(at, false);
            self.pos = at + 1;
            self.chunk_start = self.pos;
            return true;
        }
        false
    }

    fn php_tag_boundary(&self, pos: usize) -> bool {
        match self.bytes.get(pos) {
            None => true,
            Some(b) => b.is_ascii_whitespace() || *b == b'?',
        }
    }

    /// A tag name may start with a letter or with a nested echo/directive.
    fn tag_name_can_start(&self, pos: usize) -> bool {
        match self.bytes.get(pos) {
            Some(b) if b.is_ascii_alphabetic() => true,
            Some(b'{') => {
                self.starts_with(pos, b"{{") || self.starts_with(pos, b"{!!")
            }
            _ => false,
        }
    }

    fn begin_tag(&mut self, open_pos: usize, is_close: bool) {
        self.tag_open_pos = open_pos;
        self.tag_is_close = is_close;
        self.tag_has_expr = false;
        self.tag_name.clear();
        self.push_state(LexState::TagName);
        self.chunk_kind = TokenKind::TagNamePart;
    }

    /// Recovery for a tag that hit end-of-input or a stray `<`: emit a
    /// zero-width synthetic close so the tree builder can still close the
    /// tag, then reprocess from the data state.
    pub(super) fn fail_tag(&mut self, reason: &'static str) {
        let state = self.state();
        self.diagnostic(state, reason, self.tag_open_pos);
        self.flush_chunk(self.pos);
        self.emit(TokenKind::SyntheticClose, self.pos, self.pos);
        self.pop_state();
        self.chunk_kind = TokenKind::Text;
        self.chunk_start = self.pos;
    }

    /// Completes the current tag and returns to the enclosing mode,
    /// entering rawtext mode after a `<script>`/`<style>` open tag.
    pub(super) fn finish_tag(&mut self, self_closing: bool) {
        self.pop_state();
        self.chunk_kind = TokenKind::Text;
        self.chunk_start = self.pos;
        if !self.tag_is_close
            && !self_closing
            && !self.tag_has_expr
            && matches!(self.tag_name.as_str(), "script" | "style")
        {
            self.rawtext_closer = self.tag_name.clone();
            self.push_state(LexState::RawText);
        }
    }
}
