//! The mutation handle passed to visitors.
//!
//! A [`Path`] binds the current node to the document for the duration of
//! one `enter` call. Structural edits validate their target first and
//! return a [`RewriteError`] without touching the tree when the target is
//! gone or of the wrong kind; traversal-control flags are collected by the
//! rewriter after the visitor returns.

use blade_parser::{AttrValue, Attribute, Document, NodeId, NodeKind, Part};

use crate::builder::{materialize, ElementSpec, NodeSpec};
use crate::error::RewriteError;

/// A handle to the node currently being visited.
pub struct Path<'d> {
    pub(crate) doc: &'d mut Document,
    pub(crate) node: NodeId,
    pub(crate) skip_children: bool,
    pub(crate) stopped: bool,
}

impl<'d> Path<'d> {
    pub(crate) fn new(doc: &'d mut Document, node: NodeId) -> Self {
        Self {
            doc,
            node,
            skip_children: false,
            stopped: false,
        }
    }

    /// The node this path is bound to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Read access to the whole document.
    pub fn doc(&self) -> &Document {
        self.doc
    }

    /// The kind of the current node.
    pub fn kind(&self) -> &NodeKind {
        self.doc.kind(self.node)
    }

    /// The current node's lowercased tag name, when it is an element.
    pub fn tag_name(&self) -> Option<String> {
        self.doc
            .as_element(self.node)
            .map(|e| e.tag_text().to_ascii_lowercase())
    }

    // === Traversal control ===

    /// Suppresses descent into this node's children for this pass.
    pub fn skip_children(&mut self) {
        self.skip_children = true;
    }

    /// Ends the remainder of the current pass immediately. Mutations
    /// already applied remain.
    pub fn stop_traversal(&mut self) {
        self.stopped = true;
    }

    // === Structural edits ===

    /// Removes the current node from the tree.
    pub fn remove(&mut self) -> Result<(), RewriteError> {
        self.position()?;
        self.doc.detach(self.node);
        Ok(())
    }

    /// Replaces the current node with a newly built one.
    pub fn replace_with(&mut self, spec: impl Into<NodeSpec>) -> Result<NodeId, RewriteError> {
        self.replace_with_many(vec![spec.into()])
            .map(|ids| ids[0])
    }

    /// Replaces the current node with a list of newly built nodes.
    pub fn replace_with_many(
        &mut self,
        specs: Vec<NodeSpec>,
    ) -> Result<Vec<NodeId>, RewriteError> {
        let (parent, index) = self.position()?;
        self.doc.detach(self.node);
        let ids = self.materialize_all(specs);
        self.doc.insert_at(parent, index, &ids);
        Ok(ids)
    }

    /// Inserts a newly built node before the current one.
    pub fn insert_before(&mut self, spec: impl Into<NodeSpec>) -> Result<NodeId, RewriteError> {
        self.insert_before_many(vec![spec.into()])
            .map(|ids| ids[0])
    }

    /// Inserts newly built nodes before the current one.
    pub fn insert_before_many(
        &mut self,
        specs: Vec<NodeSpec>,
    ) -> Result<Vec<NodeId>, RewriteError> {
        let (parent, index) = self.position()?;
        let ids = self.materialize_all(specs);
        self.doc.insert_at(parent, index, &ids);
        Ok(ids)
    }

    /// Inserts a newly built node after the current one.
    pub fn insert_after(&mut self, spec: impl Into<NodeSpec>) -> Result<NodeId, RewriteError> {
        self.insert_after_many(vec![spec.into()])
            .map(|ids| ids[0])
    }

    /// Inserts newly built nodes after the current one.
    pub fn insert_after_many(
        &mut self,
        specs: Vec<NodeSpec>,
    ) -> Result<Vec<NodeId>, RewriteError> {
        let (parent, index) = self.position()?;
        let ids = self.materialize_all(specs);
        self.doc.insert_at(parent, index + 1, &ids);
        Ok(ids)
    }

    /// Inserts a new element at the current node's position with the
    /// current node as its sole child. Returns the wrapper.
    pub fn wrap_with(&mut self, spec: ElementSpec) -> Result<NodeId, RewriteError> {
        let (parent, index) = self.position()?;
        let wrapper = materialize(self.doc, NodeSpec::Element(spec));
        self.doc.detach(self.node);
        self.doc.insert_at(parent, index, &[wrapper]);
        self.doc.append_child(wrapper, self.node);
        Ok(wrapper)
    }

    /// Replaces the current node with its own children, spliced into the
    /// parent at its old position.
    pub fn unwrap(&mut self) -> Result<(), RewriteError> {
        let (parent, index) = self.position()?;
        self.ensure_container()?;
        let children: Vec<NodeId> = self.doc.children(self.node).to_vec();
        self.doc.replace_children(self.node, &[]);
        self.doc.detach(self.node);
        self.doc.insert_at(parent, index, &children);
        Ok(())
    }

    /// Inserts one node before, one after, and replaces the current node,
    /// in a single edit. Returns the replacement.
    pub fn surround_with(
        &mut self,
        before: impl Into<NodeSpec>,
        replacement: impl Into<NodeSpec>,
        after: impl Into<NodeSpec>,
    ) -> Result<NodeId, RewriteError> {
        let (parent, index) = self.position()?;
        self.doc.detach(self.node);
        let ids = self.materialize_all(vec![before.into(), replacement.into(), after.into()]);
        self.doc.insert_at(parent, index, &ids);
        Ok(ids[1])
    }

    // === Child-list edits ===

    /// Replaces the current node's children with newly built ones.
    pub fn replace_children(
        &mut self,
        specs: Vec<NodeSpec>,
    ) -> Result<Vec<NodeId>, RewriteError> {
        self.position()?;
        self.ensure_container()?;
        let ids = self.materialize_all(specs);
        self.doc.replace_children(self.node, &ids);
        Ok(ids)
    }

    /// Inserts newly built nodes at the front of the current node's
    /// child list.
    pub fn prepend_children(
        &mut self,
        specs: Vec<NodeSpec>,
    ) -> Result<Vec<NodeId>, RewriteError> {
        self.position()?;
        self.ensure_container()?;
        let ids = self.materialize_all(specs);
        self.doc.insert_at(Some(self.node), 0, &ids);
        Ok(ids)
    }

    /// Appends a newly built node to the current node's child list.
    pub fn append_child(&mut self, spec: impl Into<NodeSpec>) -> Result<NodeId, RewriteError> {
        self.position()?;
        self.ensure_container()?;
        let id = materialize(self.doc, spec.into());
        self.doc.append_child(self.node, id);
        Ok(id)
    }

    // === Attribute edits ===

    /// Sets an attribute, replacing any existing value. `None` produces a
    /// bare attribute.
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), RewriteError> {
        let element = self.element_mut()?;
        let new_value = value.map(AttrValue::literal);
        match element
            .attributes
            .iter_mut()
            .find(|a| a.name_text().eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = new_value,
            None => element.attributes.push(Attribute::new(name, new_value)),
        }
        Ok(())
    }

    /// Removes an attribute; returns whether one was present.
    pub fn remove_attribute(&mut self, name: &str) -> Result<bool, RewriteError> {
        let element = self.element_mut()?;
        let before = element.attributes.len();
        element
            .attributes
            .retain(|a| !a.name_text().eq_ignore_ascii_case(name));
        Ok(element.attributes.len() != before)
    }

    /// Adds a class token if not already present.
    pub fn add_class(&mut self, class: &str) -> Result<(), RewriteError> {
        let element = self.element_mut()?;
        match element
            .attributes
            .iter_mut()
            .find(|a| a.name_text().eq_ignore_ascii_case("class"))
        {
            Some(attr) => {
                let mut tokens = class_tokens(attr);
                if !tokens.iter().any(|t| t == class) {
                    tokens.push(class.to_string());
                }
                attr.value = Some(AttrValue::literal(tokens.join(" ")));
            }
            None => element
                .attributes
                .push(Attribute::new("class", Some(AttrValue::literal(class)))),
        }
        Ok(())
    }

    /// Removes a class token, preserving the order of the remaining ones.
    /// Drops the attribute entirely when no tokens remain.
    pub fn remove_class(&mut self, class: &str) -> Result<(), RewriteError> {
        let element = self.element_mut()?;
        let Some(index) = element
            .attributes
            .iter()
            .position(|a| a.name_text().eq_ignore_ascii_case("class"))
        else {
            return Ok(());
        };
        let mut tokens = class_tokens(&element.attributes[index]);
        tokens.retain(|t| t != class);
        if tokens.is_empty() {
            element.attributes.remove(index);
        } else {
            element.attributes[index].value = Some(AttrValue::literal(tokens.join(" ")));
        }
        Ok(())
    }

    /// Changes the element's tag name, preserving attributes and children.
    /// The closing tag is regenerated from the new name.
    pub fn rename_tag(&mut self, name: &str) -> Result<(), RewriteError> {
        let element = self.element_mut()?;
        element.tag_name = vec![Part::Literal(name.to_string())];
        element.close_raw = None;
        Ok(())
    }

    // === Internals ===

    fn position(&self) -> Result<(Option<NodeId>, usize), RewriteError> {
        if !self.doc.is_attached(self.node) {
            return Err(RewriteError::DetachedNode);
        }
        self.doc
            .position_of(self.node)
            .ok_or(RewriteError::DetachedNode)
    }

    fn ensure_container(&self) -> Result<(), RewriteError> {
        match self.doc.kind(self.node) {
            NodeKind::Element(element) if !element.is_leaf() => Ok(()),
            NodeKind::Directive(_) | NodeKind::DirectiveBlock => Ok(()),
            kind => Err(RewriteError::NotAContainer { found: kind.name() }),
        }
    }

    fn element_mut(&mut self) -> Result<&mut blade_parser::Element, RewriteError> {
        if !self.doc.is_attached(self.node) {
            return Err(RewriteError::DetachedNode);
        }
        if !self.doc.is_element(self.node) {
            return Err(RewriteError::NotAnElement {
                found: self.doc.kind(self.node).name(),
            });
        }
        match self.doc.element_mut(self.node) {
            Some(element) => Ok(element),
            None => Err(RewriteError::NotAnElement { found: "element" }),
        }
    }

    fn materialize_all(&mut self, specs: Vec<NodeSpec>) -> Vec<NodeId> {
        specs
            .into_iter()
            .map(|spec| materialize(self.doc, spec))
            .collect()
    }
}

fn class_tokens(attr: &Attribute) -> Vec<String> {
    attr.value
        .as_ref()
        .map(|v| v.text())
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
