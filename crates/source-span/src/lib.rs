//! Source position tracking for the Blade template engine.
//!
//! This crate provides byte spans over template source text and a line index
//! for offset ↔ line/column conversion, backing the node query surface
//! (`start_line`, `line_span`, `contains_line`, ...) exposed by the parser.

mod line_index;
mod span;

pub use line_index::{LineCol, LineIndex, LineSpan};
pub use span::{ByteOffset, Span};
