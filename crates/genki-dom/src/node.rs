//! Node tree for the document model.
//!
//! Provides the arena that backs a [`Document`](crate::Document):
//! - Stable node identifiers via slotmap keys
//! - Parent-child relationships with subtree removal
//! - Attribute, text and inline style access
//! - Lookup by `id` attribute and inclusive containment tests
//!
//! # Key Types
//!
//! - [`Dom`] - The node arena
//! - [`NodeId`] - Stable handle for a node
//! - [`NodeKind`] - Document, element or text payload

use std::fmt::Write as _;

use slotmap::{SlotMap, new_key_type};

use crate::error::{DomError, DomResult};
use crate::parser;
use crate::style;

new_key_type! {
    /// A unique identifier for a node in a [`Dom`].
    ///
    /// `NodeId`s stay valid while the tree around them changes and become
    /// invalid once the node is removed.
    pub struct NodeId;
}

/// Element tags that never have children or an end tag.
pub(crate) const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Payload of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    tag: String,
    /// Attributes in source order.
    attributes: Vec<(String, String)>,
}

impl ElementData {
    /// Create element data with a lowercased tag name and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    /// The lowercased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in source order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        let name = name.to_ascii_lowercase();
        if let Some(existing) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.attributes.len() != before
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root.
    Document,
    /// An element with a tag and attributes.
    Element(ElementData),
    /// A run of text.
    Text(String),
}

struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
        }
    }
}

/// Arena-backed node tree.
///
/// The tree always has a document root. Nodes created with
/// [`create_element`](Self::create_element) or [`create_text`](Self::create_text)
/// start detached and are attached with [`append_child`](Self::append_child).
pub struct Dom {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
}

impl Dom {
    /// Create an empty tree holding only the document root.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(NodeKind::Document));
        Self { nodes, root }
    }

    /// The document root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check whether a node ID still refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the payload of a node.
    pub fn kind(&self, id: NodeId) -> DomResult<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    fn node(&self, id: NodeId) -> DomResult<&NodeData> {
        self.nodes.get(id).ok_or(DomError::InvalidNode)
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut NodeData> {
        self.nodes.get_mut(id).ok_or(DomError::InvalidNode)
    }

    fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(DomError::NotAnElement),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(DomError::NotAnElement),
        }
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes
            .insert(NodeData::new(NodeKind::Element(ElementData::new(tag))))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(NodeData::new(NodeKind::Text(text.into())))
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if matches!(self.kind(parent)?, NodeKind::Text(_)) {
            return Err(DomError::NotAContainer);
        }
        self.node(child)?;
        if child == self.root || self.contains(child, parent) {
            return Err(DomError::CircularInsert);
        }

        self.detach(child)?;
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Detach a node from its parent without destroying it.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Ok(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|&c| c != id);
            }
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Remove a node and its whole subtree.
    ///
    /// Returns every removed node ID, the given node first.
    pub fn remove(&mut self, id: NodeId) -> DomResult<Vec<NodeId>> {
        if id == self.root {
            return Err(DomError::InvalidNode);
        }
        self.detach(id)?;

        let removed = self.preorder(id);
        for node in &removed {
            self.nodes.remove(*node);
        }
        Ok(removed)
    }

    /// Parse `html` and append the resulting nodes to `parent`.
    ///
    /// Returns the top-level nodes of the fragment in order. Nothing is
    /// inserted if the markup fails to parse.
    pub fn insert_html(&mut self, parent: NodeId, html: &str) -> DomResult<Vec<NodeId>> {
        if matches!(self.kind(parent)?, NodeKind::Text(_)) {
            return Err(DomError::NotAContainer);
        }

        let holder = self.create_element("template");
        if let Err(err) = parser::parse_into(self, holder, html) {
            let _ = self.remove(holder);
            return Err(err);
        }

        let top_level = self.node(holder)?.children.clone();
        for &node in &top_level {
            self.append_child(parent, node)?;
        }
        self.remove(holder)?;
        Ok(top_level)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Get a node's parent.
    pub fn parent(&self, id: NodeId) -> DomResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Get a node's children in order.
    pub fn children(&self, id: NodeId) -> DomResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    /// Element children only, in order.
    pub fn element_children(&self, id: NodeId) -> DomResult<Vec<NodeId>> {
        Ok(self
            .children(id)?
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_ok())
            .collect())
    }

    /// Ancestors of a node, nearest first. Does not include the node itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
        out
    }

    /// Whether `node` is `ancestor` or lies inside its subtree.
    ///
    /// Returns `false` when either node is not alive.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(node) {
            return false;
        }
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Depth-first preorder walk of a subtree, starting with `id`.
    pub fn preorder(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Find the first attached element (in document order) whose `id`
    /// attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.preorder(self.root)
            .into_iter()
            .find(|&node| self.attribute(node, "id") == Some(id))
    }

    // =========================================================================
    // Elements
    // =========================================================================

    /// The lowercased tag name of an element, or `None` for other nodes.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(ElementData::tag)
    }

    /// Read an attribute. Names are matched case-insensitively.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|e| e.attribute(name))
    }

    /// Whether an element carries an attribute, regardless of its value.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute on an element.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> DomResult<()> {
        self.element_mut(id)?.set_attribute(name, value.into());
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.element_mut(id)?.remove_attribute(name))
    }

    /// Read one inline style property (`element.style[name]`).
    pub fn style(&self, id: NodeId, name: &str) -> Option<String> {
        self.attribute(id, "style")
            .and_then(|s| style::property(s, name))
    }

    /// Write one inline style property. An empty value removes it.
    pub fn set_style(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let current = self.element(id)?.attribute("style").unwrap_or("").to_string();
        let updated = style::with_property(&current, name, value);
        let element = self.element_mut(id)?;
        if updated.is_empty() {
            element.remove_attribute("style");
        } else {
            element.set_attribute("style", updated);
        }
        Ok(())
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Concatenated text of a node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.preorder(id) {
            if let Some(NodeData {
                kind: NodeKind::Text(text),
                ..
            }) = self.nodes.get(node)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace all children of an element with a single text node.
    ///
    /// An empty string leaves the element without children.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        let node = self.node_mut(id)?;
        match node.kind {
            NodeKind::Text(_) => {
                node.kind = NodeKind::Text(text.to_string());
                return Ok(());
            }
            NodeKind::Document => return Err(DomError::NotAnElement),
            NodeKind::Element(_) => {}
        }

        let children = self.node(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(id, text_node)?;
        }
        Ok(())
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> DomResult<String> {
        let mut out = String::new();
        for &child in self.children(id)? {
            self.write_html(child, &mut out);
        }
        Ok(out)
    }

    /// Serialize a node including itself.
    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        self.node(id)?;
        let mut out = String::new();
        self.write_html(id, &mut out);
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Document => {
                for &child in &node.children {
                    self.write_html(child, out);
                }
            }
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                for (name, value) in &element.attributes {
                    if value.is_empty() {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
                    }
                }
                out.push('>');
                if VOID_TAGS.contains(&element.tag.as_str()) {
                    return;
                }
                for &child in &node.children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dom")
            .field("root", &self.root)
            .field("node_count", &self.nodes.len())
            .finish()
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.root();
        let div = dom.create_element("DIV");
        let span = dom.create_element("span");
        dom.append_child(root, div).unwrap();
        dom.append_child(div, span).unwrap();
        (dom, div, span, root)
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let (dom, div, _, _) = sample();
        assert_eq!(dom.tag_name(div), Some("div"));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let (dom, div, span, root) = sample();
        assert!(dom.contains(div, div));
        assert!(dom.contains(div, span));
        assert!(dom.contains(root, span));
        assert!(!dom.contains(span, div));
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (mut dom, div, span, _) = sample();
        assert_eq!(dom.append_child(span, div), Err(DomError::CircularInsert));
        assert_eq!(dom.append_child(div, div), Err(DomError::CircularInsert));
    }

    #[test]
    fn test_append_child_moves_node() {
        let (mut dom, div, span, root) = sample();
        dom.append_child(root, span).unwrap();
        assert!(dom.children(div).unwrap().is_empty());
        assert_eq!(dom.parent(span).unwrap(), Some(root));
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (mut dom, div, span, _) = sample();
        let removed = dom.remove(div).unwrap();
        assert_eq!(removed, vec![div, span]);
        assert!(!dom.is_alive(span));
        assert_eq!(dom.node_count(), 1);
        assert!(!dom.contains(div, span));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut dom = Dom::new();
        let root = dom.root();
        assert_eq!(dom.remove(root), Err(DomError::InvalidNode));
    }

    #[test]
    fn test_attributes() {
        let (mut dom, div, _, _) = sample();
        dom.set_attribute(div, "ID", "main").unwrap();
        assert_eq!(dom.attribute(div, "id"), Some("main"));
        assert_eq!(dom.element_by_id("main"), Some(div));

        assert!(dom.remove_attribute(div, "id").unwrap());
        assert_eq!(dom.element_by_id("main"), None);
    }

    #[test]
    fn test_detached_elements_are_not_found_by_id() {
        let mut dom = Dom::new();
        let orphan = dom.create_element("div");
        dom.set_attribute(orphan, "id", "orphan").unwrap();
        assert_eq!(dom.element_by_id("orphan"), None);
    }

    #[test]
    fn test_text_content_roundtrip() {
        let (mut dom, div, span, _) = sample();
        let text = dom.create_text("hello");
        dom.append_child(span, text).unwrap();
        assert_eq!(dom.text_content(div), "hello");

        dom.set_text_content(div, "bye").unwrap();
        assert_eq!(dom.text_content(div), "bye");
        assert!(!dom.is_alive(span));

        dom.set_text_content(div, "").unwrap();
        assert!(dom.children(div).unwrap().is_empty());
    }

    #[test]
    fn test_text_nodes_are_not_containers() {
        let mut dom = Dom::new();
        let text = dom.create_text("x");
        let div = dom.create_element("div");
        assert_eq!(dom.append_child(text, div), Err(DomError::NotAContainer));
    }

    #[test]
    fn test_inline_style() {
        let (mut dom, div, _, _) = sample();
        assert_eq!(dom.style(div, "display"), None);

        dom.set_style(div, "display", "block").unwrap();
        assert_eq!(dom.style(div, "display"), Some("block".to_string()));
        assert_eq!(dom.attribute(div, "style"), Some("display: block;"));

        dom.set_style(div, "display", "").unwrap();
        assert!(!dom.has_attribute(div, "style"));
    }

    #[test]
    fn test_outer_html() {
        let (mut dom, div, span, _) = sample();
        dom.set_attribute(div, "class", "a\"b").unwrap();
        dom.set_attribute(span, "hidden", "").unwrap();
        let text = dom.create_text("1 < 2");
        dom.append_child(span, text).unwrap();
        assert_eq!(
            dom.outer_html(div).unwrap(),
            "<div class=\"a&quot;b\"><span hidden>1 &lt; 2</span></div>"
        );
    }
}
