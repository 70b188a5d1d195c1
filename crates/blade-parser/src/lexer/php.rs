//! Lexical skipping for embedded PHP.
//!
//! Echo bodies, directive argument lists and PHP regions all need the same
//! courtesy: delimiters that appear inside a PHP string, comment or heredoc
//! must not terminate the enclosing construct. [`skip_lexical`] recognizes
//! those sub-grammars and reports how far to jump over them.

use crate::error::LexState;
use crate::token::TokenKind;

use super::Lexer;

/// Result of skipping one PHP lexical construct.
pub(super) struct Skip {
    /// Position just past the construct (or end of input).
    pub(super) end: usize,
    /// Set when the construct ran off the end of the input.
    pub(super) unterminated: Option<&'static str>,
}

/// If `bytes[pos]` starts a PHP string, comment, backtick or heredoc,
/// returns where it ends. Returns `None` for any other byte.
pub(super) fn skip_lexical(bytes: &[u8], pos: usize) -> Option<Skip> {
    match bytes[pos] {
        b'\'' | b'"' | b'`' => Some(skip_quoted(bytes, pos)),
        b'#' => Some(skip_line_comment(bytes, pos + 1)),
        b'/' => match bytes.get(pos + 1) {
            Some(b'/') => Some(skip_line_comment(bytes, pos + 2)),
            Some(b'*') => Some(skip_block_comment(bytes, pos + 2)),
            _ => None,
        },
        b'<' if bytes[pos..].starts_with(b"<<<") => skip_heredoc(bytes, pos),
        _ => None,
    }
}

fn skip_quoted(bytes: &[u8], open: usize) -> Skip {
    let quote = bytes[open];
    let mut pos = open + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b if b == quote => {
                return Skip {
                    end: pos + 1,
                    unterminated: None,
                };
            }
            _ => pos += 1,
        }
    }
    Skip {
        end: bytes.len(),
        unterminated: Some("unterminated string literal"),
    }
}

fn skip_line_comment(bytes: &[u8], start: usize) -> Skip {
    // The newline itself is not part of the comment.
    let end = bytes[start..]
        .iter()
        .position(|b| *b == b'\n')
        .map(|i| start + i)
        .unwrap_or(bytes.len());
    Skip {
        end,
        unterminated: None,
    }
}

fn skip_block_comment(bytes: &[u8], start: usize) -> Skip {
    let mut pos = start;
    while pos + 1 < bytes.len() {
        if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
            return Skip {
                end: pos + 2,
                unterminated: None,
            };
        }
        pos += 1;
    }
    Skip {
        end: bytes.len(),
        unterminated: Some("unterminated block comment"),
    }
}

/// Skips `<<<ID ... ID` heredoc and `<<<'ID' ... ID` nowdoc bodies.
///
/// Returns `None` when `<<<` is not followed by a valid label shape, in
/// which case it is treated as ordinary code.
fn skip_heredoc(bytes: &[u8], open: usize) -> Option<Skip> {
    let mut pos = open + 3;
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    let quote = match bytes.get(pos) {
        Some(b'\'') => {
            pos += 1;
            Some(b'\'')
        }
        Some(b'"') => {
            pos += 1;
            Some(b'"')
        }
        _ => None,
    };
    let label_start = pos;
    if !matches!(bytes.get(pos), Some(b) if b.is_ascii_alphabetic() || *b == b'_') {
        return None;
    }
    while matches!(bytes.get(pos), Some(b) if b.is_ascii_alphanumeric() || *b == b'_') {
        pos += 1;
    }
    let label = &bytes[label_start..pos];
    if let Some(q) = quote {
        if bytes.get(pos) != Some(&q) {
            return None;
        }
        pos += 1;
    }
    while pos < bytes.len() && matches!(bytes[pos], b' ' | b'\t' | b'\r') {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b'\n') {
        return None;
    }
    pos += 1;

    // The closing label sits at the start of a line, optionally indented.
    loop {
        let line_start = pos;
        let mut p = line_start;
        while p < bytes.len() && matches!(bytes[p], b' ' | b'\t') {
            p += 1;
        }
        if bytes[p..].starts_with(label)
            && !matches!(
                bytes.get(p + label.len()),
                Some(b) if b.is_ascii_alphanumeric() || *b == b'_'
            )
        {
            return Some(Skip {
                end: p + label.len(),
                unterminated: None,
            });
        }
        match bytes[pos..].iter().position(|b| *b == b'\n') {
            Some(i) => pos += i + 1,
            None => {
                return Some(Skip {
                    end: bytes.len(),
                    unterminated: Some("unterminated heredoc"),
                });
            }
        }
    }
}

/// Lexes a `<?php ... ?>` or `<?= ... ?>` region into a single token.
pub(super) fn lex_php_tag(lexer: &mut Lexer<'_>, at: usize, kind: TokenKind) {
    let open_len = if kind == TokenKind::PhpShortEcho { 3 } else { 5 };
    let mut pos = at + open_len;
    let end = loop {
        if pos >= lexer.bytes.len() {
            lexer.diagnostic(LexState::PhpTag, "unterminated php tag", at);
            break lexer.bytes.len();
        }
        if let Some(skip) = skip_lexical(lexer.bytes, pos) {
            if let Some(reason) = skip.unterminated {
                lexer.diagnostic(LexState::PhpTag, reason, pos);
            }
            pos = skip.end;
            continue;
        }
        if lexer.starts_with(pos, b"?>") {
            break pos + 2;
        }
        pos += 1;
    };
    lexer.flush_chunk(at);
    lexer.emit(kind, at, end);
    lexer.pos = end;
    lexer.chunk_start = end;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end_of(input: &str) -> usize {
        skip_lexical(input.as_bytes(), 0).expect("construct").end
    }

    #[test]
    fn test_skip_single_quoted() {
        assert_eq!(end_of(r"'a\'b' rest"), 6);
    }

    #[test]
    fn test_skip_double_quoted_with_escapes() {
        assert_eq!(end_of(r#""a\"b" rest"#), 6);
    }

    #[test]
    fn test_skip_line_comment_stops_at_newline() {
        assert_eq!(end_of("// hi }}\nafter"), 8);
        assert_eq!(end_of("# hi\nafter"), 4);
    }

    #[test]
    fn test_skip_block_comment() {
        assert_eq!(end_of("/* }} */x"), 8);
    }

    #[test]
    fn test_skip_heredoc() {
        let input = "<<<EOT\nbody }} \nEOT;";
        assert_eq!(end_of(input), input.len() - 1);
    }

    #[test]
    fn test_skip_nowdoc() {
        let input = "<<<'EOT'\nbody\nEOT";
        assert_eq!(end_of(input), input.len());
    }

    #[test]
    fn test_heredoc_label_boundary() {
        // `EOTX` must not close `<<<EOT`.
        let input = "<<<EOT\nEOTX\nEOT";
        assert_eq!(end_of(input), input.len());
    }

    #[test]
    fn test_not_a_heredoc() {
        assert!(skip_lexical(b"<<< 1", 0).is_none());
        assert!(skip_lexical(b"<= b", 0).is_none());
    }

    #[test]
    fn test_unterminated_string() {
        let skip = skip_lexical(b"'abc", 0).unwrap();
        assert_eq!(skip.end, 4);
        assert!(skip.unterminated.is_some());
    }
}
