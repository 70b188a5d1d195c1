//! Balanced-brace expression scanning for JSX-style attributes:
//! `{expr}`, `{...spread}` and `({expr})`.
//!
//! The scan is speculative. A newline or an `@` before the expression
//! closes means this is ordinary attribute text, so the caller rewinds and
//! lexes the `{` literally.

/// Scans `{ ... }` starting at `start`; returns the offset just past the
/// closing `}`, or `None` to rewind.
pub(super) fn scan_braced(bytes: &[u8], start: usize) -> Option<usize> {
    scan_balanced(bytes, start, b'{', b'}')
}

/// Scans `( ... )` starting at `start`, for the `({expr})` form. Only
/// accepted when the parenthesized body is itself a braced expression.
pub(super) fn scan_parenthesized(bytes: &[u8], start: usize) -> Option<usize> {
    let mut inner = start + 1;
    while matches!(bytes.get(inner), Some(b' ' | b'\t')) {
        inner += 1;
    }
    if bytes.get(inner) != Some(&b'{') {
        return None;
    }
    scan_balanced(bytes, start, b'(', b')')
}

fn scan_balanced(bytes: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    debug_assert_eq!(bytes[start], open);
    let mut depth = 0usize;
    let mut brace_depth = 0usize;
    let mut pos = start;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\n' | b'@' => return None,
            b'\'' | b'"' | b'`' => {
                let quote = bytes[pos];
                pos += 1;
                loop {
                    match bytes.get(pos) {
                        None => return None,
                        Some(b'\n') => return None,
                        Some(b'\\') => pos += 2,
                        Some(b) if *b == quote => {
                            pos += 1;
                            break;
                        }
                        Some(_) => pos += 1,
                    }
                }
                continue;
            }
            b => {
                if b == open {
                    depth += 1;
                } else if b == close {
                    depth -= 1;
                    if depth == 0 {
                        return Some(pos + 1);
                    }
                } else if b == b'{' {
                    brace_depth += 1;
                } else if b == b'}' {
                    if brace_depth == 0 {
                        return None;
                    }
                    brace_depth -= 1;
                }
            }
        }
        pos += 1;
    }
    None
}
