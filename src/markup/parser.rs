//! Rendered markup → [`MarkupTree`]
//!
//! html5ever (through `scraper`) builds the DOM and tolerates malformed
//! fragments the way browsers do. The resulting `ego_tree` is copied into the
//! arena tree, which is what later stages inspect and mutate.

use ego_tree::NodeRef;
use scraper::{Html, Node};

use super::tree::{ElementData, MarkupTree, NodeIndex, NodeKind};

/// Parse an HTML fragment into an arena tree
///
/// Never fails: stray or unmatched tags are handled by the tree builder.
#[must_use]
pub fn parse_markup(markup: &str) -> MarkupTree {
    let fragment = Html::parse_fragment(markup);
    let mut tree = MarkupTree::new();
    let root = tree.root();

    // Explicit stack so deeply nested input cannot exhaust the call stack
    let mut pending: Vec<(NodeRef<'_, Node>, NodeIndex)> = fragment
        .tree
        .root()
        .children()
        .rev()
        .map(|child| (child, root))
        .collect();

    while let Some((source, parent)) = pending.pop() {
        let Some(kind) = convert_node(source.value()) else {
            continue;
        };
        let id = tree.append(parent, kind);
        pending.extend(source.children().rev().map(|child| (child, id)));
    }

    tree
}

fn convert_node(node: &Node) -> Option<NodeKind> {
    match node {
        Node::Element(element) => {
            let mut data = ElementData::new(element.name());
            for (name, value) in &element.attrs {
                let local: &str = &name.local;
                match name.prefix.as_deref() {
                    Some(prefix) => data.set_attr(&format!("{prefix}:{local}"), &**value),
                    None => data.set_attr(local, &**value),
                }
            }
            Some(NodeKind::Element(data))
        }
        Node::Text(text) => Some(NodeKind::Text(text.to_string())),
        Node::Comment(comment) => Some(NodeKind::Comment(comment.to_string())),
        Node::Doctype(doctype) => Some(NodeKind::Doctype(doctype.name().to_string())),
        // Document, fragment and processing instructions carry no content we keep
        _ => None,
    }
}
