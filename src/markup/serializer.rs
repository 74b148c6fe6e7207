//! [`MarkupTree`] → HTML string
//!
//! Walks the subtree with an explicit stack of open/close frames so the
//! output size, not the nesting depth, bounds the work.

use super::tree::{MarkupTree, NodeIndex, NodeKind};

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are written verbatim
///
/// `noscript` is included because fragments are parsed with scripting enabled,
/// which turns its body into a single text node.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

enum Frame {
    Open(NodeIndex),
    Close(NodeIndex),
}

/// Serialize `id` and everything below it
#[must_use]
pub fn serialize_node(tree: &MarkupTree, id: NodeIndex) -> String {
    let mut output = String::new();
    let mut stack = vec![Frame::Open(id)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Open(node) => match tree.kind(node) {
                NodeKind::Root => {
                    push_children(tree, node, &mut stack);
                }
                NodeKind::Doctype(name) => {
                    output.push_str("<!DOCTYPE ");
                    output.push_str(name);
                    output.push('>');
                }
                NodeKind::Comment(comment) => {
                    output.push_str("<!--");
                    output.push_str(comment);
                    output.push_str("-->");
                }
                NodeKind::Text(text) => {
                    let raw = tree
                        .parent(node)
                        .and_then(|parent| tree.element(parent))
                        .is_some_and(|parent| RAW_TEXT_ELEMENTS.contains(&parent.name()));
                    if raw {
                        output.push_str(text);
                    } else {
                        output.push_str(&html_escape::encode_text(text));
                    }
                }
                NodeKind::Element(element) => {
                    output.push('<');
                    output.push_str(element.name());
                    for (name, value) in element.attrs() {
                        output.push(' ');
                        output.push_str(name);
                        output.push_str("=\"");
                        output.push_str(&html_escape::encode_double_quoted_attribute(value));
                        output.push('"');
                    }
                    output.push('>');

                    if VOID_ELEMENTS.contains(&element.name()) {
                        continue;
                    }
                    stack.push(Frame::Close(node));
                    push_children(tree, node, &mut stack);
                }
            },
            Frame::Close(node) => {
                if let Some(element) = tree.element(node) {
                    output.push_str("</");
                    output.push_str(element.name());
                    output.push('>');
                }
            }
        }
    }

    output
}

fn push_children(tree: &MarkupTree, node: NodeIndex, stack: &mut Vec<Frame>) {
    stack.extend(tree.children(node).iter().rev().map(|&child| Frame::Open(child)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parser::parse_markup;
    use crate::markup::tree::ElementData;

    #[test]
    fn test_serializes_table_subtree_only() {
        let tree = parse_markup("<p>before</p><table><tr><td>a</td></tr></table><p>after</p>");
        let table = tree.find_first(tree.root(), "table").unwrap();
        assert_eq!(
            serialize_node(&tree, table),
            "<table><tbody><tr><td>a</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        let th = tree.append_element(root, ElementData::new("th").with_attr("title", "\"q\" & <x>"));
        tree.append_text(th, "<b>bold</b> & co");
        let html = serialize_node(&tree, th);
        assert_eq!(
            html,
            "<th title=\"&quot;q&quot; &amp; &lt;x&gt;\">&lt;b&gt;bold&lt;/b&gt; &amp; co</th>"
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let mut tree = MarkupTree::new();
        let root = tree.root();
        let td = tree.append_element(root, ElementData::new("td"));
        tree.append_element(td, ElementData::new("input").with_attr("type", "checkbox"));
        assert_eq!(serialize_node(&tree, td), "<td><input type=\"checkbox\"></td>");
    }

    #[test]
    fn test_noscript_body_is_not_escaped() {
        let tree = parse_markup("<table><tr><td><noscript><b>x</b></noscript></td></tr></table>");
        let td = tree.find_first(tree.root(), "td").unwrap();
        assert_eq!(serialize_node(&tree, td), "<td><noscript><b>x</b></noscript></td>");
    }

    #[test]
    fn test_svg_names_round_trip() {
        let markup = "<table><tr><td><svg><linearGradient id=\"g\"></linearGradient>\
                      <use xlink:href=\"#g\"></use></svg></td></tr></table>";
        let tree = parse_markup(markup);
        let td = tree.find_first(tree.root(), "td").unwrap();
        let html = serialize_node(&tree, td);
        assert!(html.contains("<linearGradient id=\"g\"></linearGradient>"), "{html}");
        assert!(html.contains("<use xlink:href=\"#g\"></use>"), "{html}");
    }

    #[test]
    fn test_comments_round_trip() {
        let tree = parse_markup("<table><!-- note --><tr><td>a</td></tr></table>");
        let table = tree.find_first(tree.root(), "table").unwrap();
        assert!(serialize_node(&tree, table).contains("<!-- note -->"));
    }
}
