//! Markup handling: parse rendered HTML into an arena tree, inspect and
//! mutate it by index, and serialize subtrees back to HTML.

pub mod parser;
pub mod serializer;
pub mod tree;

pub use parser::parse_markup;
pub use serializer::serialize_node;
pub use tree::{ElementData, MarkupTree, NodeIndex, NodeKind};
