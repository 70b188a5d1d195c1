//! Tag scanning: names, attributes and values.
//!
//! Tags are lexed into fine-grained pieces so the builder can reconstruct
//! every byte: name parts, whitespace runs, `=`, quotes, and value chunks.
//! Echoes, directives and escapes can appear inside names and values;
//! JSX-style `{expr}` attributes are recognized in attribute positions.

use crate::error::LexState;
use crate::token::TokenKind;

use super::{jsx, Lexer};

impl<'a> Lexer<'a> {
    pub(super) fn step_tag_name(&mut self) {
        self.chunk_kind = TokenKind::TagNamePart;
        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return; // run() fails the tag at end of input
            };
            match b {
                b'<' => {
                    self.fail_tag("unexpected `<` in tag");
                    return;
                }
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.flush_chunk(self.pos);
                    self.set_state(LexState::BeforeAttrName);
                    return;
                }
                b'>' => {
                    self.flush_chunk(self.pos);
                    self.emit(TokenKind::TagClose, self.pos, self.pos + 1);
                    self.pos += 1;
                    self.finish_tag(false);
                    return;
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.flush_chunk(self.pos);
                    self.emit(TokenKind::TagSelfClose, self.pos, self.pos + 2);
                    self.pos += 2;
                    self.finish_tag(true);
                    return;
                }
                b'/' => {
                    self.flush_chunk(self.pos);
                    self.set_state(LexState::BeforeAttrName);
                    return;
                }
                b'{' => {
                    self.flush_chunk(self.pos);
                    if self.try_brace_construct() {
                        self.tag_has_expr = true;
                    } else {
                        self.tag_name.push('{');
                        self.pos += 1;
                    }
                    return;
                }
                b'@' => {
                    self.flush_chunk(self.pos);
                    if self.try_at_construct(false) {
                        self.tag_has_expr = true;
                    } else {
                        self.tag_name.push('@');
                        self.pos += 1;
                    }
                    return;
                }
                _ => {
                    self.tag_name.push(b.to_ascii_lowercase() as char);
                    self.pos += 1;
                }
            }
        }
    }

    pub(super) fn step_before_attr_name(&mut self) {
        self.chunk_kind = TokenKind::AttrNamePart;
        self.skip_tag_whitespace();
        let Some(&b) = self.bytes.get(self.pos) else {
            return;
        };
        match b {
            b'>' => {
                self.emit(TokenKind::TagClose, self.pos, self.pos + 1);
                self.pos += 1;
                self.chunk_start = self.pos;
                self.finish_tag(false);
            }
            b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                self.emit(TokenKind::TagSelfClose, self.pos, self.pos + 2);
                self.pos += 2;
                self.chunk_start = self.pos;
                self.finish_tag(true);
            }
            b'/' => {
                // Stray slash; keep it covered as whitespace.
                self.emit(TokenKind::TagWhitespace, self.pos, self.pos + 1);
                self.pos += 1;
                self.chunk_start = self.pos;
            }
            b'<' => self.fail_tag("unexpected `<` in tag"),
            b'{' => {
                if self.try_brace_construct() {
                    return;
                }
                if let Some(end) = jsx::scan_braced(self.bytes, self.pos) {
                    self.emit(TokenKind::JsxExpr, self.pos, end);
                    self.pos = end;
                    self.chunk_start = end;
                } else {
                    // Rewind: the brace is ordinary attribute-name text.
                    self.pos += 1;
                    self.set_state(LexState::AttrName);
                }
            }
            b'@' => {
                if !self.try_at_construct(false) {
                    self.pos += 1;
                    self.set_state(LexState::AttrName);
                }
            }
            _ => {
                self.set_state(LexState::AttrName);
            }
        }
    }

    pub(super) fn step_attr_name(&mut self) {
        self.chunk_kind = TokenKind::AttrNamePart;
        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return;
            };
            match b {
                b'<' => {
                    self.fail_tag("unexpected `<` in tag");
                    return;
                }
                b' ' | b'\t' | b'\r' | b'\n' => {
                    self.flush_chunk(self.pos);
                    self.set_state(LexState::AfterAttrName);
                    return;
                }
                b'=' => {
                    self.flush_chunk(self.pos);
                    self.emit(TokenKind::Equals, self.pos, self.pos + 1);
                    self.pos += 1;
                    self.chunk_start = self.pos;
                    self.set_state(LexState::BeforeAttrValue);
                    return;
                }
                b'>' | b'/' => {
                    self.flush_chunk(self.pos);
                    self.set_state(LexState::BeforeAttrName);
                    return;
                }
                b'{' => {
                    self.flush_chunk(self.pos);
                    if !self.try_brace_construct() {
                        self.pos += 1;
                    }
                    return;
                }
                b'@' => {
                    self.flush_chunk(self.pos);
                    if !self.try_at_construct(false) {
                        self.pos += 1;
                    }
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    pub(super) fn step_after_attr_name(&mut self) {
        self.chunk_kind = TokenKind::AttrNamePart;
        self.skip_tag_whitespace();
        match self.bytes.get(self.pos) {
            Some(b'=') => {
                self.emit(TokenKind::Equals, self.pos, self.pos + 1);
                self.pos += 1;
                self.chunk_start = self.pos;
                self.set_state(LexState::BeforeAttrValue);
            }
            _ => {
                // Valueless attribute; whatever follows starts fresh.
                self.set_state(LexState::BeforeAttrName);
            }
        }
    }

    pub(super) fn step_before_attr_value(&mut self) {
        self.chunk_kind = TokenKind::AttrValueUnquoted;
        self.skip_tag_whitespace();
        let Some(&b) = self.bytes.get(self.pos) else {
            return;
        };
        match b {
            b'"' | b'\'' => {
                self.emit(TokenKind::AttrQuoteOpen, self.pos, self.pos + 1);
                self.quote = b;
                self.pos += 1;
                self.chunk_start = self.pos;
                self.set_state(LexState::AttrValueQuoted);
            }
            b'<' => self.fail_tag("unexpected `<` in tag"),
            b'>' | b'/' => {
                // `attr=` with no value.
                self.set_state(LexState::BeforeAttrName);
            }
            b'{' => {
                if self.try_brace_construct() {
                    self.set_state(LexState::AttrValueUnquoted);
                    return;
                }
                if let Some(end) = jsx::scan_braced(self.bytes, self.pos) {
                    self.emit(TokenKind::JsxExpr, self.pos, end);
                    self.pos = end;
                    self.chunk_start = end;
                    self.set_state(LexState::BeforeAttrName);
                } else {
                    self.pos += 1;
                    self.set_state(LexState::AttrValueUnquoted);
                }
            }
            b'(' => {
                if let Some(end) = jsx::scan_parenthesized(self.bytes, self.pos) {
                    self.emit(TokenKind::JsxExpr, self.pos, end);
                    self.pos = end;
                    self.chunk_start = end;
                    self.set_state(LexState::BeforeAttrName);
                } else {
                    self.pos += 1;
                    self.set_state(LexState::AttrValueUnquoted);
                }
            }
            _ => {
                self.set_state(LexState::AttrValueUnquoted);
            }
        }
    }

    pub(super) fn step_attr_value_quoted(&mut self) {
        self.chunk_kind = TokenKind::AttrValueText;
        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return; // run() fails the tag at end of input
            };
            if b == self.quote {
                self.flush_chunk(self.pos);
                self.emit(TokenKind::AttrQuoteClose, self.pos, self.pos + 1);
                self.pos += 1;
                self.chunk_start = self.pos;
                self.set_state(LexState::BeforeAttrName);
                return;
            }
            match b {
                b'{' => {
                    self.flush_chunk(self.pos);
                    if !self.try_brace_construct() {
                        self.pos += 1;
                    }
                    return;
                }
                b'@' => {
                    self.flush_chunk(self.pos);
                    if !self.try_at_construct(false) {
                        self.pos += 1;
                    }
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    pub(super) fn step_attr_value_unquoted(&mut self) {
        self.chunk_kind = TokenKind::AttrValueUnquoted;
        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return;
            };
            match b {
                b'<' => {
                    self.fail_tag("unexpected `<` in tag");
                    return;
                }
                b' ' | b'\t' | b'\r' | b'\n' | b'>' => {
                    self.flush_chunk(self.pos);
                    self.set_state(LexState::BeforeAttrName);
                    return;
                }
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'>') => {
                    self.flush_chunk(self.pos);
                    self.set_state(LexState::BeforeAttrName);
                    return;
                }
                b'{' => {
                    self.flush_chunk(self.pos);
                    if !self.try_brace_construct() {
                        self.pos += 1;
                    }
                    return;
                }
                b'@' => {
                    self.flush_chunk(self.pos);
                    if !self.try_at_construct(false) {
                        self.pos += 1;
                    }
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Emits a `TagWhitespace` token for the whitespace run at `pos`.
    fn skip_tag_whitespace(&mut self) {
        let start = self.pos;
        while matches!(
            self.bytes.get(self.pos),
            Some(b' ' | b'\t' | b'\r' | b'\n')
        ) {
            self.pos += 1;
        }
        if self.pos > start {
            self.emit(TokenKind::TagWhitespace, start, self.pos);
        }
        self.chunk_start = self.pos;
    }
}
