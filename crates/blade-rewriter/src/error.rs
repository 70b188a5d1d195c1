//! Rewrite-time errors.

use thiserror::Error;

/// An error raised by a [`crate::Path`] mutation.
///
/// Structural edits validate their target first and leave the tree
/// untouched when they fail, so a visitor can recover and continue.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewriteError {
    /// The current node is no longer attached to the document.
    #[error("node is detached from the document")]
    DetachedNode,

    /// An element-only operation was applied to something else.
    #[error("expected an element, found {found}")]
    NotAnElement {
        /// The kind name of the node that was found.
        found: &'static str,
    },

    /// A child-list operation was applied to a node that cannot hold
    /// children.
    #[error("{found} nodes cannot hold children")]
    NotAContainer {
        /// The kind name of the node that was found.
        found: &'static str,
    },
}
