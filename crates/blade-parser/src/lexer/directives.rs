//! Directive argument lists and the hard-wired `@php`/`@verbatim` regions.

use crate::error::LexState;
use crate::token::TokenKind;

use super::{php, Lexer};

/// Lexes an optional `( ... )` argument list following a directive name.
///
/// Leading spaces and tabs between the name and the `(` belong to the
/// arguments token. Parentheses are balanced with PHP lexical skipping, so
/// `@if($a && in_array($b, [')']))` consumes the whole list.
pub(super) fn try_lex_args(lexer: &mut Lexer<'_>) {
    let args_start = lexer.pos;
    let mut pos = args_start;
    while pos < lexer.bytes.len() && matches!(lexer.bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    if lexer.bytes.get(pos) != Some(&b'(') {
        return;
    }
    let paren_open = pos;
    let mut depth = 0usize;
    loop {
        if pos >= lexer.bytes.len() {
            lexer.diagnostic(
                LexState::DirectiveArgs,
                "unterminated directive arguments",
                paren_open,
            );
            // Degrade: the would-be arguments stay ordinary text.
            lexer.pos = lexer.bytes.len();
            return;
        }
        if let Some(skip) = php::skip_lexical(lexer.bytes, pos) {
            if let Some(reason) = skip.unterminated {
                lexer.diagnostic(LexState::DirectiveArgs, reason, pos);
            }
            pos = skip.end;
            continue;
        }
        match lexer.bytes[pos] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    pos += 1;
                    lexer.emit(TokenKind::DirectiveArgs, args_start, pos);
                    lexer.pos = pos;
                    lexer.chunk_start = pos;
                    return;
                }
            }
            _ => {}
        }
        pos += 1;
    }
}

/// Lexes `@php ... @endphp` as an opaque PHP region.
///
/// `at` is the offset of the `@`; `name_end` is just past `php`. The body
/// is scanned with PHP lexical skipping, so a literal `@endphp` inside a
/// string or heredoc does not end the region.
pub(super) fn lex_php_block(lexer: &mut Lexer<'_>, at: usize, name_end: usize) {
    lexer.flush_chunk(at);
    lexer.emit(TokenKind::DirectiveName, at, name_end);
    let mut pos = name_end;
    loop {
        if pos >= lexer.bytes.len() {
            lexer.diagnostic(LexState::PhpBlock, "unterminated php block", at);
            if pos > name_end {
                lexer.emit(TokenKind::PhpContent, name_end, pos);
            }
            break;
        }
        if let Some(skip) = php::skip_lexical(lexer.bytes, pos) {
            if let Some(reason) = skip.unterminated {
                lexer.diagnostic(LexState::PhpBlock, reason, pos);
            }
            pos = skip.end;
            continue;
        }
        if lexer.bytes[pos] == b'@' && closer_at(lexer, pos + 1, b"endphp") {
            if pos > name_end {
                lexer.emit(TokenKind::PhpContent, name_end, pos);
            }
            let close_end = pos + 1 + b"endphp".len();
            lexer.emit(TokenKind::DirectiveName, pos, close_end);
            pos = close_end;
            break;
        }
        pos += 1;
    }
    lexer.pos = pos;
    lexer.chunk_start = pos;
}

/// Lexes `@verbatim ... @endverbatim`. The body is fully opaque: no echoes,
/// directives, tags or PHP constructs are recognized inside it.
pub(super) fn lex_verbatim(lexer: &mut Lexer<'_>, at: usize, name_end: usize) {
    lexer.flush_chunk(at);
    lexer.emit(TokenKind::DirectiveName, at, name_end);
    let mut pos = name_end;
    loop {
        if pos >= lexer.bytes.len() {
            lexer.diagnostic(LexState::Verbatim, "unterminated verbatim block", at);
            if pos > name_end {
                lexer.emit(TokenKind::VerbatimContent, name_end, pos);
            }
            break;
        }
        if lexer.bytes[pos] == b'@' && closer_at(lexer, pos + 1, b"endverbatim") {
            if pos > name_end {
                lexer.emit(TokenKind::VerbatimContent, name_end, pos);
            }
            let close_end = pos + 1 + b"endverbatim".len();
            lexer.emit(TokenKind::DirectiveName, pos, close_end);
            pos = close_end;
            break;
        }
        pos += 1;
    }
    lexer.pos = pos;
    lexer.chunk_start = pos;
}

/// Case-insensitive closer name match with an identifier boundary, so
/// `@endphpx` does not close `@php`.
fn closer_at(lexer: &Lexer<'_>, pos: usize, name: &[u8]) -> bool {
    lexer.starts_with_ci(pos, name)
        && !matches!(
            lexer.bytes.get(pos + name.len()),
            Some(b) if b.is_ascii_alphanumeric() || *b == b'_'
        )
}
