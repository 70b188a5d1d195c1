//! Echo lexing: `{{ ... }}`, `{!! ... !!}` and `{{{ ... }}}`.
//!
//! Echo bodies are PHP expressions, so the closer search skips string
//! literals, comments and heredocs. A second echo or comment opener inside
//! the body aborts the enclosing echo: its opener bytes fall back to text
//! and scanning resumes at the colliding opener.

use crate::error::LexState;
use crate::token::TokenKind;

use super::{php, Lexer};

pub(super) struct EchoDelims {
    pub(super) open: &'static [u8],
    pub(super) close: &'static [u8],
    pub(super) open_kind: TokenKind,
    pub(super) content_kind: TokenKind,
    pub(super) close_kind: TokenKind,
    pub(super) state: LexState,
}

impl EchoDelims {
    pub(super) const REGULAR: EchoDelims = EchoDelims {
        open: b"{{",
        close: b"}}",
        open_kind: TokenKind::EchoOpen,
        content_kind: TokenKind::EchoContent,
        close_kind: TokenKind::EchoClose,
        state: LexState::EchoContent,
    };

    pub(super) const RAW: EchoDelims = EchoDelims {
        open: b"{!!",
        close: b"!!}",
        open_kind: TokenKind::RawEchoOpen,
        content_kind: TokenKind::RawEchoContent,
        close_kind: TokenKind::RawEchoClose,
        state: LexState::RawEchoContent,
    };

    pub(super) const TRIPLE: EchoDelims = EchoDelims {
        open: b"{{{",
        close: b"}}}",
        open_kind: TokenKind::TripleEchoOpen,
        content_kind: TokenKind::TripleEchoContent,
        close_kind: TokenKind::TripleEchoClose,
        state: LexState::TripleEchoContent,
    };
}

enum Body {
    /// Offset of the closer.
    Closed(usize),
    /// Offset of a colliding echo or comment opener inside the body.
    Collision(usize),
    Unterminated,
}

/// Lexes one echo starting at `at`. On success the open/content/close
/// tokens are emitted; on collision or end of input the echo is abandoned
/// and its bytes remain ordinary text.
pub(super) fn lex_echo(lexer: &mut Lexer<'_>, at: usize, delims: EchoDelims) {
    let body_start = at + delims.open.len();
    match scan_body(lexer, body_start, &delims) {
        Body::Closed(close_start) => {
            lexer.flush_chunk(at);
            lexer.emit(delims.open_kind, at, body_start);
            if close_start > body_start {
                lexer.emit(delims.content_kind, body_start, close_start);
            }
            let end = close_start + delims.close.len();
            lexer.emit(delims.close_kind, close_start, end);
            lexer.pos = end;
            lexer.chunk_start = end;
        }
        Body::Collision(opener) => {
            lexer.diagnostic(delims.state, "unexpected opener inside echo", at);
            // `at..opener` stays in the pending text run; the colliding
            // opener is rescanned from scratch.
            lexer.pos = opener;
        }
        Body::Unterminated => {
            lexer.diagnostic(delims.state, "unterminated echo", at);
            lexer.pos = lexer.bytes.len();
        }
    }
}

fn scan_body(lexer: &Lexer<'_>, start: usize, delims: &EchoDelims) -> Body {
    let bytes = lexer.bytes;
    let mut pos = start;
    loop {
        if pos >= bytes.len() {
            return Body::Unterminated;
        }
        if let Some(skip) = php::skip_lexical(bytes, pos) {
            if skip.unterminated.is_some() {
                return Body::Unterminated;
            }
            pos = skip.end;
            continue;
        }
        if lexer.starts_with(pos, delims.close) {
            return Body::Closed(pos);
        }
        if bytes[pos] == b'{'
            && (lexer.starts_with(pos, b"{{") || lexer.starts_with(pos, b"{!!"))
        {
            return Body::Collision(pos);
        }
        pos += 1;
    }
}
