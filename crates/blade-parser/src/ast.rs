//! Node model for parsed Blade templates.
//!
//! Nodes live in an id-indexed arena owned by [`Document`]. Every node built
//! by the tree builder stores the byte span it was parsed from; rendering an
//! untouched subtree re-emits that span verbatim, which is what makes the
//! round trip lossless. Mutations mark a node and its ancestors dirty, and
//! dirty or detached nodes are reconstructed from their parts instead.

use smol_str::SmolStr;
use source_span::{LineIndex, LineSpan, Span};

/// An index into a document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The escaping flavor of an interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoKind {
    /// `{{ expr }}` — output is HTML-escaped.
    Regular,
    /// `{!! expr !!}` — output is raw.
    Raw,
    /// `{{{ expr }}}` — legacy triple form.
    Triple,
}

impl EchoKind {
    /// The opening delimiter for this echo flavor.
    pub fn open(&self) -> &'static str {
        match self {
            EchoKind::Regular => "{{",
            EchoKind::Raw => "{!!",
            EchoKind::Triple => "{{{",
        }
    }

    /// The closing delimiter for this echo flavor.
    pub fn close(&self) -> &'static str {
        match self {
            EchoKind::Regular => "}}",
            EchoKind::Raw => "!!}",
            EchoKind::Triple => "}}}",
        }
    }

    /// Returns true if the output of this echo is HTML-escaped.
    pub fn is_escaped(&self) -> bool {
        !matches!(self, EchoKind::Raw)
    }
}

/// An interpolation expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Echo {
    /// The escaping flavor.
    pub kind: EchoKind,
    /// The expression text between the delimiters, spacing preserved.
    pub content: String,
}

impl Echo {
    /// Renders this echo with its delimiters.
    pub fn render(&self) -> String {
        format!("{}{}{}", self.kind.open(), self.content, self.kind.close())
    }
}

/// The structural role a directive plays after block pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectiveRole {
    /// Not part of any block.
    #[default]
    Standalone,
    /// Opens a block; owns the first branch as children.
    Opener,
    /// Starts a new branch inside a block; owns that branch as children.
    Intermediate,
    /// Closes a block; never has children.
    Closer,
}

/// A `@name[(args)]` directive.
///
/// When the directive is part of a [`DirectiveBlock`], its children are the
/// nodes of the branch it introduces.
#[derive(Debug, Clone)]
pub struct Directive {
    /// The directive name, original case, without the `@`.
    pub name: SmolStr,
    /// Exact whitespace between the name and the argument list.
    pub whitespace_before_args: String,
    /// The raw argument list including parentheses, if present.
    pub arguments: Option<String>,
    /// The role assigned during block pairing.
    pub role: DirectiveRole,
}

impl Directive {
    /// The directive name lowercased, for case-insensitive matching.
    pub fn lowered_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// The argument text without the surrounding parentheses.
    pub fn arguments_content(&self) -> Option<&str> {
        self.arguments
            .as_deref()
            .map(|raw| raw.strip_prefix('(').unwrap_or(raw))
            .map(|raw| raw.strip_suffix(')').unwrap_or(raw))
    }

    /// Renders the directive head (`@name`, whitespace and arguments),
    /// without any branch children.
    pub fn render_head(&self) -> String {
        let mut out = String::from("@");
        out.push_str(&self.name);
        if let Some(args) = &self.arguments {
            out.push_str(&self.whitespace_before_args);
            out.push_str(args);
        }
        out
    }
}

/// A piece of a composite tag name, attribute name, or attribute value.
///
/// Names and values may contain nested echoes and directives, e.g.
/// `<{{ $tag }} class="@if($a) on @endif">`.
#[derive(Debug, Clone)]
pub enum Part {
    /// Literal text.
    Literal(String),
    /// A nested echo.
    Echo(Echo),
    /// A nested directive head.
    Directive(Directive),
}

impl Part {
    /// Renders this part back to text.
    pub fn render(&self) -> String {
        match self {
            Part::Literal(text) => text.clone(),
            Part::Echo(echo) => echo.render(),
            Part::Directive(directive) => directive.render_head(),
        }
    }
}

/// Renders a list of parts back to text.
pub fn render_parts(parts: &[Part]) -> String {
    parts.iter().map(Part::render).collect()
}

/// How an attribute was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttrKind {
    /// `name="value"` or bare `name`.
    #[default]
    Plain,
    /// `:name="expr"` — bound component attribute.
    Bound,
    /// `::name="value"` — escaped leading colon, renders literally.
    Escaped,
    /// `{expr}` — JSX-style shorthand.
    Shorthand,
    /// `{...expr}` — JSX-style spread.
    Spread,
    /// `name={expr}` or `name=({expr})` — JSX-style expression value.
    JsxExpr,
}

/// The quoting style of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Unquoted,
}

impl Quote {
    fn delimiter(&self) -> &'static str {
        match self {
            Quote::Double => "\"",
            Quote::Single => "'",
            Quote::Unquoted => "",
        }
    }
}

/// An attribute value.
#[derive(Debug, Clone)]
pub struct AttrValue {
    /// The quoting style.
    pub quote: Quote,
    /// The value content, possibly mixing text with echoes/directives.
    pub parts: Vec<Part>,
}

impl AttrValue {
    /// Creates a double-quoted literal value.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            quote: Quote::Double,
            parts: vec![Part::Literal(text.into())],
        }
    }

    /// The value rendered without quotes.
    pub fn text(&self) -> String {
        render_parts(&self.parts)
    }

    fn render(&self) -> String {
        let delim = self.quote.delimiter();
        format!("{delim}{}{delim}", self.text())
    }
}

/// An attribute on an element.
///
/// The exact whitespace around the attribute is stored so that
/// reconstructing a tag whose attributes were never touched reproduces the
/// original bytes.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Exact whitespace before the attribute.
    pub leading: String,
    /// The attribute name, possibly composite.
    pub name: Vec<Part>,
    /// Exact whitespace between the name and `=`.
    pub before_eq: String,
    /// Exact whitespace between `=` and the value.
    pub after_eq: String,
    /// The value, or `None` for bare attributes.
    pub value: Option<AttrValue>,
    /// How the attribute was written.
    pub kind: AttrKind,
}

impl Attribute {
    /// Creates a plain attribute with a single space of leading whitespace.
    pub fn new(name: impl Into<String>, value: Option<AttrValue>) -> Self {
        Self {
            leading: " ".to_string(),
            name: vec![Part::Literal(name.into())],
            before_eq: String::new(),
            after_eq: String::new(),
            value,
            kind: AttrKind::Plain,
        }
    }

    /// The attribute name rendered to text.
    pub fn name_text(&self) -> String {
        render_parts(&self.name)
    }

    /// Renders the attribute including its leading whitespace.
    pub fn render(&self) -> String {
        let mut out = self.leading.clone();
        out.push_str(&render_parts(&self.name));
        if let Some(value) = &self.value {
            out.push_str(&self.before_eq);
            out.push('=');
            out.push_str(&self.after_eq);
            out.push_str(&value.render());
        }
        out
    }
}

/// HTML void elements, which never take children or closing tags.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns true if the given element name is an HTML void element.
pub fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// An HTML-like element.
#[derive(Debug, Clone)]
pub struct Element {
    /// The tag name, possibly composite (`<{{ $tag }}>`).
    pub tag_name: Vec<Part>,
    /// The attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Exact whitespace between the last attribute and `>` / `/>`.
    pub ws_before_close: String,
    /// True for `<br/>`-style self-closing tags.
    pub self_closing: bool,
    /// True for HTML void elements.
    pub void: bool,
    /// True when the element was closed by recovery rather than a real
    /// closing tag; renders no closing tag.
    pub synthetic_close: bool,
    /// The exact closing tag text (`</div >`), when one was parsed.
    pub close_raw: Option<String>,
}

impl Element {
    /// The tag name rendered to text.
    pub fn tag_text(&self) -> String {
        render_parts(&self.tag_name)
    }

    /// Returns true if this element never renders a closing tag.
    pub fn is_leaf(&self) -> bool {
        self.self_closing || self.void || self.synthetic_close
    }
}

/// A `<!-- ... -->` comment.
#[derive(Debug, Clone)]
pub struct Comment {
    /// The text between the delimiters.
    pub content: String,
    /// False when the comment ran to end of input unterminated.
    pub closed: bool,
}

/// A `{{-- ... --}}` comment.
#[derive(Debug, Clone)]
pub struct BladeComment {
    /// The text between the delimiters.
    pub content: String,
    /// False when the comment ran to end of input unterminated.
    pub closed: bool,
}

/// A `<![CDATA[ ... ]]>` section.
#[derive(Debug, Clone)]
pub struct Cdata {
    /// The text between the delimiters.
    pub content: String,
    /// False when the section ran to end of input unterminated.
    pub closed: bool,
}

/// The flavor of an inline PHP tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhpTagKind {
    /// `<?php ... ?>`
    Full,
    /// `<?= ... ?>`
    ShortEcho,
}

/// An inline PHP region.
#[derive(Debug, Clone)]
pub struct PhpTag {
    /// The tag flavor.
    pub kind: PhpTagKind,
    /// The PHP code between the delimiters.
    pub content: String,
    /// False when the region ran to end of input without `?>`.
    pub closed: bool,
}

/// A `@php ... @endphp` block.
#[derive(Debug, Clone)]
pub struct PhpBlock {
    /// The PHP code between the delimiters.
    pub content: String,
    /// The opening directive as written (`@php`, case preserved).
    pub open_raw: String,
    /// The closing directive as written, if one was found.
    pub close_raw: Option<String>,
}

/// A `@verbatim ... @endverbatim` block; everything inside is literal.
#[derive(Debug, Clone)]
pub struct Verbatim {
    /// The literal content.
    pub content: String,
    /// The opening directive as written.
    pub open_raw: String,
    /// The closing directive as written, if one was found.
    pub close_raw: Option<String>,
}

/// A node in the template tree.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain text.
    Text(String),
    /// An interpolation.
    Echo(Echo),
    /// A directive; children hold its branch content when it belongs to a
    /// block.
    Directive(Directive),
    /// A paired run of block directives; children are the directives in
    /// order `[opener, intermediates..., closer]`.
    DirectiveBlock,
    /// An element; children are its content nodes.
    Element(Element),
    /// An HTML comment.
    Comment(Comment),
    /// A Blade comment.
    BladeComment(BladeComment),
    /// A conditional comment, stored raw.
    ConditionalComment(String),
    /// A CDATA section.
    Cdata(Cdata),
    /// A processing instruction, stored raw.
    ProcessingInstruction(String),
    /// A doctype declaration, stored raw.
    Doctype(String),
    /// A bogus comment, stored raw.
    BogusComment(String),
    /// An inline PHP tag.
    PhpTag(PhpTag),
    /// A `@php ... @endphp` block.
    PhpBlock(PhpBlock),
    /// A `@verbatim ... @endverbatim` block.
    Verbatim(Verbatim),
    /// An escaped `@`; renders a literal `@`.
    Escape,
}

impl NodeKind {
    /// Returns a short name for this node kind.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Text(_) => "text",
            NodeKind::Echo(_) => "echo",
            NodeKind::Directive(_) => "directive",
            NodeKind::DirectiveBlock => "directive block",
            NodeKind::Element(_) => "element",
            NodeKind::Comment(_) => "comment",
            NodeKind::BladeComment(_) => "blade comment",
            NodeKind::ConditionalComment(_) => "conditional comment",
            NodeKind::Cdata(_) => "cdata",
            NodeKind::ProcessingInstruction(_) => "processing instruction",
            NodeKind::Doctype(_) => "doctype",
            NodeKind::BogusComment(_) => "bogus comment",
            NodeKind::PhpTag(_) => "php tag",
            NodeKind::PhpBlock(_) => "php block",
            NodeKind::Verbatim(_) => "verbatim",
            NodeKind::Escape => "escape",
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    span: Option<Span>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    dirty: bool,
}

/// A parsed template.
///
/// Owns the node arena, the original source text and a line index. Nodes are
/// addressed by [`NodeId`]; removed nodes stay in the arena but are no
/// longer reachable from the roots.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    line_index: LineIndex,
    nodes: Vec<NodeData>,
    roots: Vec<NodeId>,
}

impl Document {
    pub(crate) fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let line_index = LineIndex::new(&source);
        Self {
            source,
            line_index,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The root nodes in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub(crate) fn set_roots(&mut self, roots: Vec<NodeId>) {
        for &id in &roots {
            self.nodes[id.index()].parent = None;
        }
        self.roots = roots;
    }

    /// Allocates a detached node with no source span.
    ///
    /// Detached nodes always render by reconstruction.
    pub fn alloc_detached(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            span: None,
            parent: None,
            children: Vec::new(),
            dirty: true,
        });
        id
    }

    pub(crate) fn alloc_spanned(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            span: Some(span),
            parent: None,
            children: Vec::new(),
            dirty: false,
        });
        id
    }

    pub(crate) fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].span = Some(span);
    }

    /// Mutable kind access for the tree builder. Unlike [`Self::kind_mut`]
    /// this does not mark the node dirty; parse-time fixups still render
    /// from their spans.
    pub(crate) fn kind_mut_raw(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    // === Queries ===

    /// The kind of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// The source span of a node, if it was produced by parsing.
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.nodes[id.index()].span
    }

    /// The parent of a node, or `None` for roots and detached nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// The children of a node in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// The child list of `parent`, or the roots when `parent` is `None`.
    pub fn child_list(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(id) => self.children(id),
            None => &self.roots,
        }
    }

    /// The node's parent and position within its sibling list.
    ///
    /// Returns `None` when the node is fully detached.
    pub fn position_of(&self, id: NodeId) -> Option<(Option<NodeId>, usize)> {
        let parent = self.nodes[id.index()].parent;
        let list = self.child_list(parent);
        let index = list.iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    /// The next sibling of a node.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.position_of(id)?;
        self.child_list(parent).get(index + 1).copied()
    }

    /// The previous sibling of a node.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.position_of(id)?;
        index.checked_sub(1).map(|i| self.child_list(parent)[i])
    }

    /// Iterates over the ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    /// Returns true if the node is reachable from the document roots.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            match self.nodes[current.index()].parent {
                Some(parent) => current = parent,
                None => return self.roots.contains(&current),
            }
        }
    }

    // === Narrowing ===

    /// Narrows to an element, if this node is one.
    pub fn as_element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Narrows to a directive, if this node is one.
    pub fn as_directive(&self, id: NodeId) -> Option<&Directive> {
        match self.kind(id) {
            NodeKind::Directive(directive) => Some(directive),
            _ => None,
        }
    }

    /// Narrows to an echo, if this node is one.
    pub fn as_echo(&self, id: NodeId) -> Option<&Echo> {
        match self.kind(id) {
            NodeKind::Echo(echo) => Some(echo),
            _ => None,
        }
    }

    /// Narrows to text content, if this node is a text node.
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns true if the node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element(_))
    }

    /// Returns true if the node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Text(_))
    }

    /// Returns true if the node is an echo.
    pub fn is_echo(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Echo(_))
    }

    /// Returns true if the node is a directive.
    pub fn is_directive(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Directive(_))
    }

    /// Returns true if the node is a directive block.
    pub fn is_directive_block(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::DirectiveBlock)
    }

    /// The opening directive of a directive block.
    pub fn block_opener(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_directive_block(id) {
            return None;
        }
        self.children(id).first().copied()
    }

    /// The closing directive of a directive block.
    pub fn block_closer(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_directive_block(id) {
            return None;
        }
        self.children(id).last().copied()
    }

    // === Line queries ===

    /// The 0-indexed line the node starts on.
    pub fn start_line(&self, id: NodeId) -> Option<u32> {
        let span = self.span(id)?;
        Some(self.line_index.line_col(span.start)?.line)
    }

    /// The 0-indexed line the node ends on.
    pub fn end_line(&self, id: NodeId) -> Option<u32> {
        Some(self.line_span(id)?.end_line)
    }

    /// The 0-indexed column the node starts at.
    pub fn start_column(&self, id: NodeId) -> Option<u32> {
        let span = self.span(id)?;
        Some(self.line_index.line_col(span.start)?.col)
    }

    /// The 0-indexed column just past the node's last byte.
    pub fn end_column(&self, id: NodeId) -> Option<u32> {
        let span = self.span(id)?;
        Some(self.line_index.line_col(span.end)?.col)
    }

    /// The range of lines the node covers.
    pub fn line_span(&self, id: NodeId) -> Option<LineSpan> {
        let span = self.span(id)?;
        self.line_index.line_span(span)
    }

    /// Returns true if the node touches the given 0-indexed line.
    pub fn contains_line(&self, id: NodeId, line: u32) -> bool {
        self.line_span(id).is_some_and(|s| s.contains_line(line))
    }

    /// Returns true if the node spans more than one line.
    pub fn is_multiline(&self, id: NodeId) -> bool {
        self.line_span(id).is_some_and(|s| s.is_multiline())
    }

    // === Mutation primitives ===
    //
    // These are the low-level operations the rewriter's `Path` API is built
    // on. They keep parent links and dirtiness consistent; they do not
    // validate that the edit makes sense for the node kind.

    /// Marks a node and all of its ancestors dirty.
    pub fn mark_dirty(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node) = current {
            let data = &mut self.nodes[node.index()];
            if data.dirty {
                break;
            }
            data.dirty = true;
            current = data.parent;
        }
    }

    /// Detaches a node from its parent (or from the roots).
    pub fn detach(&mut self, id: NodeId) {
        let Some((parent, index)) = self.position_of(id) else {
            return;
        };
        match parent {
            Some(p) => {
                self.nodes[p.index()].children.remove(index);
                self.mark_dirty(p);
            }
            None => {
                self.roots.remove(index);
            }
        }
        self.nodes[id.index()].parent = None;
        self.mark_dirty(id);
    }

    /// Inserts nodes into a child list at the given index.
    pub fn insert_at(&mut self, parent: Option<NodeId>, index: usize, ids: &[NodeId]) {
        for &id in ids {
            self.nodes[id.index()].parent = parent;
            self.mark_dirty(id);
        }
        match parent {
            Some(p) => {
                let children = &mut self.nodes[p.index()].children;
                let index = index.min(children.len());
                children.splice(index..index, ids.iter().copied());
                self.mark_dirty(p);
            }
            None => {
                let index = index.min(self.roots.len());
                self.roots.splice(index..index, ids.iter().copied());
            }
        }
    }

    /// Appends a node to another node's children.
    pub fn append_child(&mut self, parent: NodeId, id: NodeId) {
        let index = self.nodes[parent.index()].children.len();
        self.insert_at(Some(parent), index, &[id]);
    }

    pub(crate) fn adopt_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for &child in &children {
            self.nodes[child.index()].parent = Some(parent);
        }
        self.nodes[parent.index()].children = children;
    }

    /// Replaces a node's entire child list, detaching the old children.
    pub fn replace_children(&mut self, parent: NodeId, ids: &[NodeId]) {
        let old = std::mem::take(&mut self.nodes[parent.index()].children);
        for child in old {
            self.nodes[child.index()].parent = None;
        }
        for &id in ids {
            self.nodes[id.index()].parent = Some(parent);
            self.mark_dirty(id);
        }
        self.nodes[parent.index()].children = ids.to_vec();
        self.mark_dirty(parent);
    }

    /// Mutable access to an element's payload; marks the node dirty.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.mark_dirty(id);
        match &mut self.nodes[id.index()].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Mutable access to a node's kind; marks the node dirty.
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        self.mark_dirty(id);
        &mut self.nodes[id.index()].kind
    }

    // === Rendering ===

    /// Renders the whole document back to text.
    ///
    /// For an unmutated document this reproduces the source byte-for-byte.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for &root in &self.roots {
            self.render_node_into(root, &mut out);
        }
        out
    }

    /// Renders a single node (and its subtree) back to text.
    pub fn render_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_node_into(id, &mut out);
        out
    }

    /// Renders only a node's children, without its own delimiters.
    pub fn render_children_only(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.render_node_into(child, &mut out);
        }
        out
    }

    fn render_node_into(&self, id: NodeId, out: &mut String) {
        let data = &self.nodes[id.index()];
        if !data.dirty {
            if let Some(span) = data.span {
                out.push_str(span.slice(&self.source));
                return;
            }
        }
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Echo(echo) => out.push_str(&echo.render()),
            NodeKind::Directive(directive) => {
                out.push_str(&directive.render_head());
                for &child in &data.children {
                    self.render_node_into(child, out);
                }
            }
            NodeKind::DirectiveBlock => {
                for &child in &data.children {
                    self.render_node_into(child, out);
                }
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag_text());
                for attribute in &element.attributes {
                    out.push_str(&attribute.render());
                }
                out.push_str(&element.ws_before_close);
                if element.self_closing {
                    out.push_str("/>");
                } else {
                    out.push('>');
                }
                for &child in &data.children {
                    self.render_node_into(child, out);
                }
                if !element.is_leaf() {
                    match &element.close_raw {
                        Some(raw) => out.push_str(raw),
                        None => {
                            out.push_str("</");
                            out.push_str(&element.tag_text());
                            out.push('>');
                        }
                    }
                }
            }
            NodeKind::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(&comment.content);
                if comment.closed {
                    out.push_str("-->");
                }
            }
            NodeKind::BladeComment(comment) => {
                out.push_str("{{--");
                out.push_str(&comment.content);
                if comment.closed {
                    out.push_str("--}}");
                }
            }
            NodeKind::ConditionalComment(raw) => out.push_str(raw),
            NodeKind::Cdata(cdata) => {
                out.push_str("<![CDATA[");
                out.push_str(&cdata.content);
                if cdata.closed {
                    out.push_str("]]>");
                }
            }
            NodeKind::ProcessingInstruction(raw) => out.push_str(raw),
            NodeKind::Doctype(raw) => out.push_str(raw),
            NodeKind::BogusComment(raw) => out.push_str(raw),
            NodeKind::PhpTag(php) => {
                out.push_str(match php.kind {
                    PhpTagKind::Full => "<?php",
                    PhpTagKind::ShortEcho => "<?=",
                });
                out.push_str(&php.content);
                if php.closed {
                    out.push_str("?>");
                }
            }
            NodeKind::PhpBlock(block) => {
                out.push_str(&block.open_raw);
                out.push_str(&block.content);
                if let Some(close) = &block.close_raw {
                    out.push_str(close);
                }
            }
            NodeKind::Verbatim(verbatim) => {
                out.push_str(&verbatim.open_raw);
                out.push_str(&verbatim.content);
                if let Some(close) = &verbatim.close_raw {
                    out.push_str(close);
                }
            }
            NodeKind::Escape => out.push('@'),
        }
    }
}
