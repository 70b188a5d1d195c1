//! Structural rewriting for Blade template trees.
//!
//! A [`Rewriter`] runs [`Visitor`]s over a parsed
//! [`Document`](blade_parser::Document) in a single depth-first pre-order
//! pass. Each visitor receives a [`Path`] handle exposing structural edits
//! (remove, replace, insert, wrap, unwrap), attribute edits and traversal
//! control. Untouched parts of the tree still render byte-for-byte from
//! their source spans; only mutated subtrees are reconstructed.
//!
//! # Example
//!
//! ```
//! use blade_parser::parse;
//! use blade_rewriter::{ElementSpec, Rewriter};
//!
//! let doc = parse("@if($s)<span>x</span>@endif").document;
//! let doc = Rewriter::new()
//!     .with_visitor(|path: &mut blade_rewriter::Path<'_>| {
//!         if path.tag_name().as_deref() == Some("span") {
//!             path.wrap_with(ElementSpec::new("div").class("wrapper")).ok();
//!         }
//!     })
//!     .rewrite(doc);
//!
//! assert_eq!(
//!     doc.render(),
//!     "@if($s)<div class=\"wrapper\"><span>x</span></div>@endif"
//! );
//! ```

mod builder;
mod error;
mod path;
mod rewriter;
mod visitor;

pub use builder::{ElementSpec, NodeSpec};
pub use error::RewriteError;
pub use path::Path;
pub use rewriter::Rewriter;
pub use visitor::Visitor;
