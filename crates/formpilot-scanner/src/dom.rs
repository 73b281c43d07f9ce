//! Rust-side snapshot of a page's element tree.
//!
//! The live page is walked once (see [`crate::cdp`]) and serialized into a
//! nested structure; it is flattened here into an arena in document order
//! so discovery can run as plain tree queries. Node indices double as the
//! markers stamped onto the live elements during the walk, which is how an
//! element is addressed before it has an id.

use std::collections::HashMap;

use serde::Deserialize;

use formpilot_protocols::error::ScannerError;

/// Index of a node within a [`PageDocument`] arena. Equals the marker
/// stamped on the live element during the snapshot walk.
pub type NodeIndex = usize;

/// One element node captured by the page walk.
#[derive(Debug, Clone)]
pub struct DomNode {
    /// Lowercase tag name.
    pub tag: String,

    /// Raw attribute values.
    pub attributes: HashMap<String, String>,

    /// Direct text content of this node (child text nodes only).
    pub text: String,

    /// Whether the element has a layout box.
    pub rendered: bool,

    pub parent: Option<NodeIndex>,

    pub children: Vec<NodeIndex>,
}

impl DomNode {
    /// Attribute value, `None` when absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute presence (covers boolean attributes like `hidden`).
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// Nested node shape produced by the in-page walk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub tag: String,

    #[serde(default)]
    pub attrs: HashMap<String, String>,

    #[serde(default)]
    pub text: String,

    #[serde(default = "default_rendered")]
    pub rendered: bool,

    #[serde(default)]
    pub children: Vec<RawNode>,
}

fn default_rendered() -> bool {
    true
}

/// Arena-allocated element tree in document order.
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    nodes: Vec<DomNode>,
}

impl PageDocument {
    /// Flatten a walked tree. Nodes are numbered preorder, matching the
    /// marker sequence the walk stamped on the live elements.
    pub fn from_snapshot(root: RawNode) -> Self {
        let mut doc = PageDocument::default();
        doc.push_raw(root, None);
        doc
    }

    /// Parse a snapshot straight from its JSON form.
    pub fn from_snapshot_value(value: serde_json::Value) -> Result<Self, ScannerError> {
        let raw: RawNode = serde_json::from_value(value)
            .map_err(|e| ScannerError::Page(format!("malformed page snapshot: {e}")))?;
        Ok(Self::from_snapshot(raw))
    }

    fn push_raw(&mut self, raw: RawNode, parent: Option<NodeIndex>) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(DomNode {
            tag: raw.tag.to_ascii_lowercase(),
            attributes: raw.attrs,
            text: raw.text,
            rendered: raw.rendered,
            parent,
            children: Vec::new(),
        });
        for child in raw.children {
            let child_index = self.push_raw(child, Some(index));
            self.nodes[index].children.push(child_index);
        }
        index
    }

    pub fn node(&self, index: NodeIndex) -> &DomNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node indices in document order.
    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> {
        0..self.nodes.len()
    }

    /// Full text of a subtree, whitespace-collapsed and trimmed.
    pub fn text_content(&self, index: NodeIndex) -> String {
        let mut pieces = Vec::new();
        self.collect_text(index, &mut pieces);
        let joined = pieces.join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, index: NodeIndex, pieces: &mut Vec<String>) {
        let node = &self.nodes[index];
        if !node.text.is_empty() {
            pieces.push(node.text.clone());
        }
        for &child in &node.children {
            self.collect_text(child, pieces);
        }
    }

    /// Ancestors of `index`, nearest first.
    pub fn ancestors(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        std::iter::successors(self.nodes[index].parent, |&i| self.nodes[i].parent)
    }

    /// The sibling element immediately before `index`, if any.
    pub fn preceding_sibling(&self, index: NodeIndex) -> Option<NodeIndex> {
        let parent = self.nodes[index].parent?;
        let siblings = &self.nodes[parent].children;
        let position = siblings.iter().position(|&s| s == index)?;
        position.checked_sub(1).map(|p| siblings[p])
    }

    /// First node (document order) with `tag` whose attribute `name`
    /// equals `value`.
    pub fn find_by_attr(&self, tag: &str, name: &str, value: &str) -> Option<NodeIndex> {
        self.iter().find(|&i| {
            let node = &self.nodes[i];
            node.tag == tag && node.attr(name) == Some(value)
        })
    }

    /// First node whose id attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.iter().find(|&i| self.nodes[i].attr("id") == Some(id))
    }

    /// True when the node or one of its ancestors carries the `hidden`
    /// attribute.
    pub fn in_hidden_subtree(&self, index: NodeIndex) -> bool {
        if self.nodes[index].has_attr("hidden") {
            return true;
        }
        self.ancestors(index)
            .any(|a| self.nodes[a].has_attr("hidden"))
    }
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
