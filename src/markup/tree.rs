//! Arena-backed markup tree
//!
//! Nodes live in a single `Vec` and are addressed by [`NodeIndex`]. Child
//! lists are index sequences and each node records its parent, so the tree
//! has no reference cycles and can be walked or mutated without `Rc`.

use crate::utils::ROW_ID_ATTRIBUTE;

/// Index of a node inside a [`MarkupTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

/// Element name plus attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    name: String,
    attrs: Vec<(String, String)>,
}

impl ElementData {
    /// Create an element
    ///
    /// The name is kept as given: the parser already lowercases HTML names and
    /// restores the case of foreign ones such as SVG `linearGradient`.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Append a class to the existing class list
    pub fn add_class(&mut self, class: &str) {
        let merged = match self.attr("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", merged);
    }

    /// Non-empty `data-row-id` value, if present
    #[must_use]
    pub fn row_id_marker(&self) -> Option<&str> {
        self.attr(ROW_ID_ATTRIBUTE).filter(|value| !value.is_empty())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Payload of a tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Doctype(String),
    Comment(String),
    Text(String),
    Element(ElementData),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
}

/// Arena tree of markup nodes
#[derive(Debug, Clone)]
pub struct MarkupTree {
    nodes: Vec<Node>,
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupTree {
    /// Create a tree holding only the root node
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    #[must_use]
    pub fn kind(&self, id: NodeIndex) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeIndex) -> Option<NodeIndex> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn children(&self, id: NodeIndex) -> &[NodeIndex] {
        &self.nodes[id.0].children
    }

    #[must_use]
    pub fn element(&self, id: NodeIndex) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeIndex) -> Option<&mut ElementData> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Whether `id` is an element named `name`
    #[must_use]
    pub fn is_element(&self, id: NodeIndex, name: &str) -> bool {
        self.element(id).is_some_and(|data| data.is(name))
    }

    fn insert(&mut self, parent: NodeIndex, kind: NodeKind, at_start: bool) -> NodeIndex {
        let id = NodeIndex(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        let siblings = &mut self.nodes[parent.0].children;
        if at_start {
            siblings.insert(0, id);
        } else {
            siblings.push(id);
        }
        id
    }

    /// Add `kind` as the last child of `parent`
    pub fn append(&mut self, parent: NodeIndex, kind: NodeKind) -> NodeIndex {
        self.insert(parent, kind, false)
    }

    /// Add `kind` as the first child of `parent`
    pub fn prepend(&mut self, parent: NodeIndex, kind: NodeKind) -> NodeIndex {
        self.insert(parent, kind, true)
    }

    pub fn append_element(&mut self, parent: NodeIndex, element: ElementData) -> NodeIndex {
        self.append(parent, NodeKind::Element(element))
    }

    pub fn append_text(&mut self, parent: NodeIndex, text: impl Into<String>) -> NodeIndex {
        self.append(parent, NodeKind::Text(text.into()))
    }

    /// Descendants of `id` in document order, excluding `id` itself
    #[must_use]
    pub fn descendants(&self, id: NodeIndex) -> Descendants<'_> {
        let mut stack: Vec<NodeIndex> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Descendant elements named `name`, in document order
    pub fn descendant_elements<'a>(
        &'a self,
        id: NodeIndex,
        name: &'a str,
    ) -> impl Iterator<Item = NodeIndex> + 'a {
        self.descendants(id)
            .filter(move |&node| self.is_element(node, name))
    }

    /// Direct children that are elements, with their data
    pub fn child_elements(
        &self,
        id: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, &ElementData)> + '_ {
        self.children(id)
            .iter()
            .filter_map(move |&child| self.element(child).map(|data| (child, data)))
    }

    /// First element named `name` in document order below `id`
    #[must_use]
    pub fn find_first(&self, id: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.descendant_elements(id, name).next()
    }

    /// Concatenated text of every text node below `id`
    #[must_use]
    pub fn text_content(&self, id: NodeIndex) -> String {
        let mut text = String::new();
        for node in self.descendants(id) {
            if let NodeKind::Text(chunk) = self.kind(node) {
                text.push_str(chunk);
            }
        }
        text
    }
}

/// Pre-order iterator produced by [`MarkupTree::descendants`]
pub struct Descendants<'a> {
    tree: &'a MarkupTree,
    stack: Vec<NodeIndex>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (MarkupTree, NodeIndex) {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        let table = tree.append_element(root, ElementData::new("table"));
        let tr = tree.append_element(table, ElementData::new("tr"));
        let td = tree.append_element(tr, ElementData::new("td"));
        tree.append_text(td, "Item ");
        let b = tree.append_element(td, ElementData::new("b"));
        tree.append_text(b, "7");
        (tree, table)
    }

    #[test]
    fn test_descendants_are_document_order() {
        let (tree, table) = sample();
        let names: Vec<_> = tree
            .descendants(table)
            .filter_map(|id| tree.element(id).map(|e| e.name().to_string()))
            .collect();
        assert_eq!(names, vec!["tr", "td", "b"]);
    }

    #[test]
    fn test_text_content_concatenates() {
        let (tree, table) = sample();
        assert_eq!(tree.text_content(table), "Item 7");
    }

    #[test]
    fn test_prepend_places_child_first() {
        let (mut tree, table) = sample();
        let tr = tree.find_first(table, "tr").unwrap();
        let th = tree.prepend(tr, NodeKind::Element(ElementData::new("th")));
        assert_eq!(tree.children(tr)[0], th);
        assert_eq!(tree.parent(th), Some(tr));
    }

    #[test]
    fn test_add_class_handles_empty_list() {
        let mut el = ElementData::new("table");
        el.add_class("progress-tracking-table");
        assert_eq!(el.attr("class"), Some("progress-tracking-table"));

        let mut el = ElementData::new("table").with_attr("class", "wikitable ");
        el.add_class("progress-tracking-table");
        assert_eq!(el.attr("class"), Some("wikitable progress-tracking-table"));
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = ElementData::new("tr")
            .with_attr("data-row-id", "a")
            .with_attr("id", "x");
        el.set_attr("data-row-id", "b");
        let attrs: Vec<_> = el.attrs().collect();
        assert_eq!(attrs, vec![("data-row-id", "b"), ("id", "x")]);
    }

    #[test]
    fn test_empty_row_id_marker_is_absent() {
        let el = ElementData::new("tr").with_attr("data-row-id", "");
        assert_eq!(el.row_id_marker(), None);
    }
}
