//! Table inspection and augmentation
//!
//! Rows are every `<tr>` below the table in document order. A row with a
//! direct `<th>` child is a header row; every other row is a data row.

pub mod mutator;
pub mod profiler;
pub mod row_id;

pub use mutator::{AugmentSummary, MutationOptions, augment_table};
pub use profiler::{ColumnProfile, profile_columns, validate_unique_column};
pub use row_id::{RowId, explicit_row_id, resolve_row_id, validate_row_ids};

use crate::markup::{ElementData, MarkupTree, NodeIndex};

/// All rows of `table` in document order
pub fn rows(tree: &MarkupTree, table: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
    tree.descendant_elements(table, "tr")
}

/// Whether `row` has a header cell among its direct children
#[must_use]
pub fn is_header_row(tree: &MarkupTree, row: NodeIndex) -> bool {
    tree.child_elements(row).any(|(_, cell)| cell.is("th"))
}

/// Rows without a header cell, in document order
pub fn data_rows(tree: &MarkupTree, table: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
    rows(tree, table).filter(move |&row| !is_header_row(tree, row))
}

/// First row carrying a header cell
#[must_use]
pub fn first_header_row(tree: &MarkupTree, table: NodeIndex) -> Option<NodeIndex> {
    rows(tree, table).find(|&row| is_header_row(tree, row))
}

/// Direct `<td>`/`<th>` children of `row`
pub fn cells(
    tree: &MarkupTree,
    row: NodeIndex,
) -> impl Iterator<Item = (NodeIndex, &ElementData)> + '_ {
    tree.child_elements(row)
        .filter(|(_, cell)| cell.is("td") || cell.is("th"))
}
