//! Arena-backed HTML document tree.
//!
//! Pages are parsed once into a [`Document`], mutated in place by the table
//! synthesizer, and serialized back with [`to_html`]. Nodes live in a flat
//! vector and are addressed by [`NodeId`]; detached nodes are allowed and
//! simply never reached by serialization.
//!
//! Text and attribute values are stored exactly as they appeared in the
//! source (still entity-escaped) so untouched markup round-trips unchanged.
//! Values created through the mutation API are escaped on the way in.

mod parse;
pub mod select;
mod serialize;

pub use parse::parse_html;
pub use serialize::{node_to_html, to_html};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::DomError;

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The document root; exactly one per document, at index 0.
    Document,
    /// `<!DOCTYPE ...>`; holds the text between `<!` and `>`.
    Doctype(String),
    /// `<!-- ... -->`; holds the comment body.
    Comment(String),
    /// Character data, still HTML-escaped.
    Text(String),
    /// An element.
    Element(Element),
}

/// Element tag and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub name: String,
    /// Attributes in source order; values are raw (still escaped).
    pub attrs: IndexMap<String, String>,
    /// Written as `<tag/>` in the source.
    pub self_closing: bool,
}

impl Element {
    /// Creates an element with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attrs: IndexMap::new(),
            self_closing: false,
        }
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether the `class` attribute contains `class` as a token.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An HTML document held as an arena of nodes.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
        }
    }

    /// The document root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a document has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Payload of `id`, if it exists.
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0).map(|n| &n.data)
    }

    /// Element payload of `id`, or `None` for non-element nodes.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.data(id) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Ok(el),
            Some(_) => Err(DomError::NotAContainer(id.0)),
            None => Err(DomError::InvalidNode(id.0)),
        }
    }

    /// Tag name of an element node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.name.as_str())
    }

    /// Parent of `id`; `None` for the root and for detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// All children of `id`, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children of `id`, in order (text and comments skipped).
    #[must_use]
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.element(child).is_some())
            .collect()
    }

    /// Attribute value of an element, raw as stored.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.attrs.get(name))
            .map(String::as_str)
    }

    /// Whether element `id` carries `class` in its class list.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// All descendants of `id` in document (pre-)order, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Concatenated, entity-decoded text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut raw = String::new();
        if let Some(NodeData::Text(text)) = self.data(id) {
            raw.push_str(text);
        }
        for node in self.descendants(id) {
            if let Some(NodeData::Text(text)) = self.data(node) {
                raw.push_str(text);
            }
        }
        unescape(&raw)
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    pub(crate) fn push(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            data,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(None, NodeData::Element(Element::new(name)))
    }

    /// Creates a detached element with a `class` attribute.
    pub fn create_element_with_class(&mut self, name: &str, class: &str) -> NodeId {
        let mut el = Element::new(name);
        el.attrs.insert("class".to_string(), escape_attr(class));
        self.push(None, NodeData::Element(el))
    }

    /// Creates a detached text node; `text` is plain text and gets escaped.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(None, NodeData::Text(escape_text(text)))
    }

    /// Sets attribute `name` to the plain-text `value` (escaped on store).
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `id` is not an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        el.attrs
            .insert(name.to_ascii_lowercase(), escape_attr(value));
        Ok(())
    }

    /// Adds `class` to the class list of `id` unless already present.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] if `id` is not an element.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if el.has_class(class) {
            return Ok(());
        }
        let value = match el.attrs.get("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim_end(), escape_attr(class))
            }
            _ => escape_attr(class),
        };
        el.attrs.insert("class".to_string(), value);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------------

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let Some(parent_node) = self.nodes.get(parent.0) else {
            return Err(DomError::InvalidNode(parent.0));
        };
        if child.0 >= self.nodes.len() {
            return Err(DomError::InvalidNode(child.0));
        }
        if !matches!(parent_node.data, NodeData::Document | NodeData::Element(_)) {
            return Err(DomError::NotAContainer(parent.0));
        }
        if child == self.root() || child == parent || self.is_descendant_of(parent, child) {
            return Err(DomError::Cycle(child.0));
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|&c| c != child);
        }
    }

    /// Moves `child` to the end of `parent`'s children.
    ///
    /// # Errors
    ///
    /// Returns [`DomError`] on invalid ids, non-container parents or cycles.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Moves `child` into `parent` immediately before `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAChild`] if `reference` is not a child of
    /// `parent`, plus the failures of [`Document::append_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::NotAChild {
                parent: parent.0,
                reference: reference.0,
            });
        }
        if child == reference {
            return Ok(());
        }
        self.detach(child);
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
            .ok_or(DomError::NotAChild {
                parent: parent.0,
                reference: reference.0,
            })?;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        Ok(())
    }
}

// ============================================================================
// Escaping
// ============================================================================

/// Escapes plain text for use as HTML character data.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes plain text for use inside a double-quoted attribute value.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decodes the named entities Sphinx emits plus numeric character references.
///
/// Unknown entities are left untouched.
#[must_use]
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let div = doc.create_element_with_class("div", "outer box");
        doc.append_child(doc.root(), div).unwrap();
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        doc.append_child(div, a).unwrap();
        doc.append_child(div, b).unwrap();
        (doc, div, a, b)
    }

    #[test]
    fn test_class_tokens() {
        let (doc, div, _, _) = sample();
        assert!(doc.has_class(div, "outer"));
        assert!(doc.has_class(div, "box"));
        assert!(!doc.has_class(div, "out"));
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let (mut doc, div, _, _) = sample();
        doc.add_class(div, "box").unwrap();
        doc.add_class(div, "extra").unwrap();
        assert_eq!(doc.attr(div, "class"), Some("outer box extra"));
    }

    #[test]
    fn test_insert_before_places_child() {
        let (mut doc, div, a, b) = sample();
        let new = doc.create_element("table");
        doc.insert_before(div, new, b).unwrap();
        assert_eq!(doc.children(div), &[a, new, b]);
        assert_eq!(doc.parent(new), Some(div));
    }

    #[test]
    fn test_insert_before_rejects_foreign_reference() {
        let (mut doc, div, a, _) = sample();
        let new = doc.create_element("span");
        let err = doc.insert_before(a, new, div).unwrap_err();
        assert!(matches!(err, DomError::NotAChild { .. }));
    }

    #[test]
    fn test_append_rejects_cycle() {
        let (mut doc, div, a, _) = sample();
        assert_eq!(doc.append_child(a, div), Err(DomError::Cycle(div.index())));
    }

    #[test]
    fn test_append_moves_existing_node() {
        let (mut doc, div, a, b) = sample();
        doc.append_child(b, a).unwrap();
        assert_eq!(doc.children(div), &[b]);
        assert_eq!(doc.children(b), &[a]);
    }

    #[test]
    fn test_text_nodes_cannot_have_children() {
        let mut doc = Document::new();
        let text = doc.create_text("hi");
        let span = doc.create_element("span");
        assert_eq!(
            doc.append_child(text, span),
            Err(DomError::NotAContainer(text.index()))
        );
    }

    #[test]
    fn test_text_content_decodes() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_child(doc.root(), p).unwrap();
        let t = doc.create_text("a < b & c");
        doc.append_child(p, t).unwrap();
        assert_eq!(doc.text_content(p), "a < b & c");
    }

    #[test]
    fn test_unescape_numeric_and_unknown() {
        assert_eq!(unescape("&#91;0&#x5D;"), "[0]");
        assert_eq!(unescape("&bogus; & done"), "&bogus; & done");
        assert_eq!(unescape("x&nbsp;y"), "x\u{a0}y");
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr(r#"a"b&c"#), "a&quot;b&amp;c");
    }
}
