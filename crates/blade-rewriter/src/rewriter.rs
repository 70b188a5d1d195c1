//! The traversal engine.

use blade_parser::{Document, NodeId};

use crate::path::Path;
use crate::visitor::Visitor;

/// Runs visitors over a document in a single depth-first pre-order pass.
///
/// Mutations apply immediately. When the current node is removed or
/// replaced during its own visit, the traversal relocates to the first
/// surviving sibling from before the mutation, so siblings are neither
/// revisited nor skipped. Sequential passes compose by feeding one
/// rewriter's output document into the next.
#[derive(Default)]
pub struct Rewriter {
    visitors: Vec<Box<dyn Visitor>>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a visitor; visitors run in registration order.
    pub fn add_visitor(&mut self, visitor: impl Visitor + 'static) {
        self.visitors.push(Box::new(visitor));
    }

    /// Builder-style variant of [`Self::add_visitor`].
    pub fn with_visitor(mut self, visitor: impl Visitor + 'static) -> Self {
        self.add_visitor(visitor);
        self
    }

    /// Runs one full pass over the document and returns it.
    pub fn rewrite(&mut self, mut doc: Document) -> Document {
        let mut stopped = false;
        self.walk(&mut doc, None, &mut stopped);
        doc
    }

    fn walk(&mut self, doc: &mut Document, parent: Option<NodeId>, stopped: &mut bool) {
        let mut cursor = 0usize;
        loop {
            if *stopped {
                return;
            }
            let list = doc.child_list(parent);
            let Some(&node) = list.get(cursor) else {
                return;
            };
            // Remaining siblings before any mutation; used to relocate if
            // the current node goes away.
            let snapshot: Vec<NodeId> = list[cursor + 1..].to_vec();

            let mut skip = false;
            for visitor in self.visitors.iter_mut() {
                let mut path = Path::new(doc, node);
                visitor.enter(&mut path);
                skip |= path.skip_children;
                *stopped |= path.stopped;
                if *stopped {
                    return;
                }
                // A removed or reparented node is not offered to the
                // remaining visitors.
                if !still_under(doc, parent, node) {
                    break;
                }
            }

            if still_under(doc, parent, node) {
                if !skip {
                    self.walk(doc, Some(node), stopped);
                    if *stopped {
                        return;
                    }
                }
                let list = doc.child_list(parent);
                cursor = list
                    .iter()
                    .position(|&c| c == node)
                    .map_or(list.len(), |i| i + 1);
            } else {
                // Relocate to the first pre-mutation sibling still in the
                // list; replacements spliced in are intentionally passed
                // over.
                let list = doc.child_list(parent);
                cursor = snapshot
                    .iter()
                    .find_map(|s| list.iter().position(|c| c == s))
                    .unwrap_or(list.len());
            }
        }
    }
}

fn still_under(doc: &Document, parent: Option<NodeId>, node: NodeId) -> bool {
    doc.position_of(node)
        .map(|(p, _)| p == parent)
        .unwrap_or(false)
}
