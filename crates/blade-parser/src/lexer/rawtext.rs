//! Rawtext mode for `<script>` and `<style>` contents.
//!
//! Markup is suspended in here: the only `<` that matters is the matching
//! `</script`/`</style` closer. Blade constructs stay live so echoes and
//! directives inside scripts and styles are still recognized, but PHP tags
//! are not.

use crate::error::LexState;
use crate::token::TokenKind;

use super::Lexer;

impl<'a> Lexer<'a> {
    pub(super) fn step_rawtext(&mut self) {
        self.chunk_kind = TokenKind::Text;
        let Some(offset) = self.bytes[self.pos..]
            .iter()
            .position(|b| matches!(b, b'{' | b'<' | b'@'))
        else {
            // The region runs to end of input; the builder closes the
            // element there.
            self.pos = self.bytes.len();
            return;
        };
        let candidate = self.pos + offset;
        self.pos = candidate;
        let consumed = match self.bytes[candidate] {
            b'@' => self.try_at_construct(true),
            b'{' => self.try_brace_construct(),
            b'<' => self.try_rawtext_close(candidate),
            _ => unreachable!(),
        };
        if !consumed {
            self.pos = candidate + 1;
        }
    }

    /// Recognizes `</name` (case-insensitive, `name` being the tag that
    /// opened the region) followed by whitespace, `>` or end of input.
    fn try_rawtext_close(&mut self, at: usize) -> bool {
        if !self.starts_with(at, b"</") {
            return false;
        }
        let name_start = at + 2;
        let name = std::mem::take(&mut self.rawtext_closer);
        let matches_name = self.starts_with_ci(name_start, name.as_bytes());
        let name_end = name_start + name.len();
        let boundary = match self.bytes.get(name_end) {
            None => true,
            Some(b) => b.is_ascii_whitespace() || *b == b'>',
        };
        if !matches_name || !boundary {
            self.rawtext_closer = name;
            return false;
        }
        self.flush_chunk(at);
        self.emit(TokenKind::CloseTagOpen, at, name_start);
        self.emit(TokenKind::TagNamePart, name_start, name_end);
        // Leave rawtext mode and finish the close tag in the ordinary
        // tag states.
        self.pop_state();
        self.tag_open_pos = at;
        self.tag_is_close = true;
        self.tag_has_expr = false;
        self.tag_name = name;
        self.push_state(LexState::BeforeAttrName);
        self.pos = name_end;
        self.chunk_start = name_end;
        self.chunk_kind = TokenKind::AttrNamePart;
        true
    }
}
