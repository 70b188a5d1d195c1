//! Comment-like regions: Blade comments, HTML comments, conditional
//! comments, CDATA, doctype, processing instructions and bogus markup.

use crate::error::LexState;
use crate::token::TokenKind;

use super::Lexer;

/// Scans from `start` to just past `closer`, or to end of input.
fn scan_to(lexer: &mut Lexer<'_>, start: usize, closer: &[u8], state: LexState, at: usize) -> usize {
    let mut pos = start;
    while pos < lexer.bytes.len() {
        if lexer.starts_with(pos, closer) {
            return pos + closer.len();
        }
        pos += 1;
    }
    lexer.diagnostic(state, "unterminated region", at);
    lexer.bytes.len()
}

fn emit_region(lexer: &mut Lexer<'_>, kind: TokenKind, at: usize, end: usize) {
    lexer.flush_chunk(at);
    lexer.emit(kind, at, end);
    lexer.pos = end;
    lexer.chunk_start = end;
}

/// `{{-- ... --}}`. Nothing inside is interpreted.
pub(super) fn lex_blade_comment(lexer: &mut Lexer<'_>, at: usize) {
    let end = scan_to(lexer, at + 4, b"--}}", LexState::BladeComment, at);
    emit_region(lexer, TokenKind::BladeComment, at, end);
}

/// `<!-- ... -->`.
pub(super) fn lex_html_comment(lexer: &mut Lexer<'_>, at: usize) {
    let end = scan_to(lexer, at + 4, b"-->", LexState::Comment, at);
    emit_region(lexer, TokenKind::HtmlComment, at, end);
}

/// `<!--[if ...]> ... <![endif]-->`, kept as one opaque token. When the
/// `<![endif]-->` closer is missing the region falls back to an ordinary
/// HTML comment ending at `-->`.
pub(super) fn lex_conditional_comment(lexer: &mut Lexer<'_>, at: usize) {
    let closer = b"<![endif]-->";
    let mut pos = at + 4;
    while pos < lexer.bytes.len() {
        if lexer.starts_with_ci(pos, closer) {
            emit_region(lexer, TokenKind::ConditionalComment, at, pos + closer.len());
            return;
        }
        pos += 1;
    }
    lex_html_comment(lexer, at);
}

/// `<![CDATA[ ... ]]>`.
pub(super) fn lex_cdata(lexer: &mut Lexer<'_>, at: usize) {
    let end = scan_to(lexer, at + 9, b"]]>", LexState::Cdata, at);
    emit_region(lexer, TokenKind::Cdata, at, end);
}

/// `<!doctype ... >`, case-insensitive.
pub(super) fn lex_doctype(lexer: &mut Lexer<'_>, at: usize) {
    let end = scan_to(lexer, at + 9, b">", LexState::Doctype, at);
    emit_region(lexer, TokenKind::Doctype, at, end);
}

/// `<? ... ?>` that is neither `<?php` nor `<?=`.
pub(super) fn lex_processing_instruction(lexer: &mut Lexer<'_>, at: usize) {
    let end = scan_to(lexer, at + 2, b"?>", LexState::ProcessingInstruction, at);
    emit_region(lexer, TokenKind::ProcessingInstruction, at, end);
}

/// `<!` followed by anything else; consumed through the next `>` the way
/// the HTML tokenizer handles bogus comments.
pub(super) fn lex_bogus_comment(lexer: &mut Lexer<'_>, at: usize) {
    let end = scan_to(lexer, at + 2, b">", LexState::BogusComment, at);
    emit_region(lexer, TokenKind::BogusComment, at, end);
}
