//! Templates for nodes created during rewriting.
//!
//! Mutations take [`NodeSpec`] values and materialize them into detached
//! arena nodes on demand. Detached nodes have no source span, so they
//! always render by reconstruction.

use blade_parser::{
    is_void_element, Attribute, AttrValue, Comment, Document, Echo, EchoKind, Element, NodeId,
    NodeKind, Part, PhpTag, PhpTagKind,
};

/// A description of a node to create.
#[derive(Debug, Clone)]
pub enum NodeSpec {
    /// Plain text.
    Text(String),
    /// An escaped `{{ ... }}` echo around the given expression.
    Echo(String),
    /// A raw `{!! ... !!}` echo around the given expression.
    RawEcho(String),
    /// A `<!-- ... -->` comment around the given text.
    Comment(String),
    /// A `<?php ... ?>` region around the given code.
    PhpTag(String),
    /// An element built from an [`ElementSpec`].
    Element(ElementSpec),
}

impl From<&str> for NodeSpec {
    fn from(text: &str) -> Self {
        NodeSpec::Text(text.to_string())
    }
}

impl From<String> for NodeSpec {
    fn from(text: String) -> Self {
        NodeSpec::Text(text)
    }
}

impl From<ElementSpec> for NodeSpec {
    fn from(spec: ElementSpec) -> Self {
        NodeSpec::Element(spec)
    }
}

/// A description of an element to create.
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: String,
    attributes: Vec<(String, Option<String>)>,
    classes: Vec<String>,
    self_closing: bool,
    children: Vec<NodeSpec>,
}

impl ElementSpec {
    /// Starts an element with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
            self_closing: false,
            children: Vec::new(),
        }
    }

    /// Adds a `name="value"` attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), Some(value.into())));
        self
    }

    /// Adds a bare attribute with no value.
    pub fn bare_attr(mut self, name: impl Into<String>) -> Self {
        self.attributes.push((name.into(), None));
        self
    }

    /// Adds a class token.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Marks the element self-closing.
    pub fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    /// Appends a child node.
    pub fn child(mut self, child: impl Into<NodeSpec>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Materializes a spec into a detached node in the document's arena.
pub(crate) fn materialize(doc: &mut Document, spec: NodeSpec) -> NodeId {
    match spec {
        NodeSpec::Text(text) => doc.alloc_detached(NodeKind::Text(text)),
        NodeSpec::Echo(content) => doc.alloc_detached(NodeKind::Echo(Echo {
            kind: EchoKind::Regular,
            content,
        })),
        NodeSpec::RawEcho(content) => doc.alloc_detached(NodeKind::Echo(Echo {
            kind: EchoKind::Raw,
            content,
        })),
        NodeSpec::Comment(content) => doc.alloc_detached(NodeKind::Comment(Comment {
            content,
            closed: true,
        })),
        NodeSpec::PhpTag(content) => doc.alloc_detached(NodeKind::PhpTag(PhpTag {
            kind: PhpTagKind::Full,
            content,
            closed: true,
        })),
        NodeSpec::Element(spec) => {
            let mut attributes: Vec<Attribute> = spec
                .attributes
                .into_iter()
                .map(|(name, value)| Attribute::new(name, value.map(AttrValue::literal)))
                .collect();
            if !spec.classes.is_empty() {
                let joined = spec.classes.join(" ");
                match attributes
                    .iter_mut()
                    .find(|a| a.name_text().eq_ignore_ascii_case("class"))
                {
                    Some(attr) => {
                        let mut text = attr
                            .value
                            .as_ref()
                            .map(|v| v.text())
                            .unwrap_or_default();
                        if !text.is_empty() {
                            text.push(' ');
                        }
                        text.push_str(&joined);
                        attr.value = Some(AttrValue::literal(text));
                    }
                    None => {
                        attributes.push(Attribute::new("class", Some(AttrValue::literal(joined))));
                    }
                }
            }
            let void = is_void_element(&spec.tag);
            let element = Element {
                tag_name: vec![Part::Literal(spec.tag)],
                attributes,
                ws_before_close: String::new(),
                self_closing: spec.self_closing,
                void,
                synthetic_close: false,
                close_raw: None,
            };
            let id = doc.alloc_detached(NodeKind::Element(element));
            for child in spec.children {
                let child_id = materialize(doc, child);
                doc.append_child(id, child_id);
            }
            id
        }
    }
}
