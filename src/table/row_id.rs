//! Row identifier resolution
//!
//! Resolution order for a data row, first match wins:
//! 1. `data-row-id` on the row, else the last `data-row-id` on any of its cells
//! 2. trimmed text of the unique column cell, when a unique column is configured
//! 3. `row_<n>` where `n` is the zero-based position among data rows
//!
//! Values from 1 and 2 are sanitized to `[A-Za-z0-9_-]`.

use std::fmt;

use super::{cells, data_rows};
use crate::config::TrackingConfig;
use crate::error::{ProcessingError, ProcessingResult, Stage};
use crate::guard::Deadline;
use crate::markup::{MarkupTree, NodeIndex};
use crate::utils::FALLBACK_ROW_ID_PREFIX;

/// Sanitized, non-empty row identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(String);

impl RowId {
    /// Replace every character outside `[A-Za-z0-9_-]` with `_`
    ///
    /// Returns `None` for an empty input.
    #[must_use]
    pub fn sanitize(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let safe = raw
            .chars()
            .map(|c| if is_id_char(c) { c } else { '_' })
            .collect();
        Some(Self(safe))
    }

    /// Positional identifier for the `index`-th data row
    #[must_use]
    pub fn fallback(index: usize) -> Self {
        Self(format!("{FALLBACK_ROW_ID_PREFIX}{index}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Characters allowed verbatim in a row identifier
#[inline]
fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

/// Identifier attached to the row or, failing that, to its last marked cell
#[must_use]
pub fn explicit_row_id(tree: &MarkupTree, row: NodeIndex) -> Option<&str> {
    if let Some(id) = tree.element(row).and_then(|el| el.row_id_marker()) {
        return Some(id);
    }
    cells(tree, row)
        .filter_map(|(_, cell)| cell.row_id_marker())
        .last()
}

/// Trimmed, non-empty text of the cell at `column`
#[must_use]
pub fn unique_column_text(tree: &MarkupTree, row: NodeIndex, column: usize) -> Option<String> {
    let (cell, _) = cells(tree, row).nth(column)?;
    let text = tree.text_content(cell);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Resolve the canonical identifier for the `data_row_index`-th data row
#[must_use]
pub fn resolve_row_id(
    tree: &MarkupTree,
    row: NodeIndex,
    data_row_index: usize,
    unique_column: Option<usize>,
) -> RowId {
    if let Some(id) = explicit_row_id(tree, row).and_then(RowId::sanitize) {
        return id;
    }

    if let Some(id) = unique_column
        .and_then(|column| unique_column_text(tree, row, column))
        .and_then(|text| RowId::sanitize(&text))
    {
        return id;
    }

    RowId::fallback(data_row_index)
}

/// Require an explicit identifier on every data row
///
/// Used when no unique column is configured. Returns the number of data rows.
///
/// # Errors
///
/// [`ProcessingError::MaxRowsExceeded`] past `max_rows` data rows,
/// [`ProcessingError::MissingRowIdentifiers`] on the first unmarked row,
/// [`ProcessingError::Timeout`] when the deadline trips.
pub fn validate_row_ids(
    tree: &MarkupTree,
    table: NodeIndex,
    config: &TrackingConfig,
    deadline: &Deadline<'_>,
) -> ProcessingResult<usize> {
    deadline.check(Stage::RowValidation)?;

    let mut processed = 0;
    for row in data_rows(tree, table) {
        deadline.check(Stage::RowValidation)?;
        if processed >= config.max_rows() {
            return Err(ProcessingError::MaxRowsExceeded {
                limit: config.max_rows(),
            });
        }
        if explicit_row_id(tree, row).is_none() {
            return Err(ProcessingError::MissingRowIdentifiers);
        }
        processed += 1;
    }
    Ok(processed)
}
