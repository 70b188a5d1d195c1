//! The visitor callback interface.

use crate::path::Path;

/// A rewrite callback invoked for every node in document order.
///
/// A [`crate::Rewriter`] holds an ordered list of visitors sharing one
/// depth-first pre-order traversal: each node is offered to every visitor
/// before the traversal descends into its children. Mutations made through
/// the [`Path`] take effect immediately.
pub trait Visitor {
    /// Called when the traversal enters `path`'s node.
    fn enter(&mut self, path: &mut Path<'_>);
}

impl<F> Visitor for F
where
    F: FnMut(&mut Path<'_>),
{
    fn enter(&mut self, path: &mut Path<'_>) {
        self(path)
    }
}
