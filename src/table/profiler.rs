//! Column profiling and `unique-column-index` validation
//!
//! Only runs when a unique column was requested. Scans at most `max_rows`
//! rows; hitting the cap simply ends the scan.

use tracing::debug;

use super::{cells, rows};
use crate::config::TrackingConfig;
use crate::error::{ProcessingError, ProcessingResult, Stage};
use crate::guard::Deadline;
use crate::markup::{MarkupTree, NodeIndex};

/// Width observed over the scanned rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnProfile {
    /// Largest cell count of any scanned row
    pub max_columns: usize,
    /// Rows actually scanned
    pub rows_examined: usize,
    /// Whether the row cap stopped the scan early
    pub truncated: bool,
}

/// Count cells per row and track the widest row
///
/// # Errors
///
/// [`ProcessingError::MaxColumnsExceeded`] when a row has more than
/// `max_columns` cells, [`ProcessingError::Timeout`] when the deadline trips.
pub fn profile_columns(
    tree: &MarkupTree,
    table: NodeIndex,
    config: &TrackingConfig,
    deadline: &Deadline<'_>,
) -> ProcessingResult<ColumnProfile> {
    deadline.check(Stage::ColumnProfiling)?;

    let mut profile = ColumnProfile {
        max_columns: 0,
        rows_examined: 0,
        truncated: false,
    };

    for row in rows(tree, table) {
        deadline.check(Stage::ColumnProfiling)?;
        if profile.rows_examined >= config.max_rows() {
            profile.truncated = true;
            break;
        }

        let cell_count = cells(tree, row).count();
        if cell_count > config.max_columns() {
            return Err(ProcessingError::MaxColumnsExceeded {
                limit: config.max_columns(),
            });
        }

        profile.max_columns = profile.max_columns.max(cell_count);
        profile.rows_examined += 1;
    }

    debug!(
        max_columns = profile.max_columns,
        rows = profile.rows_examined,
        truncated = profile.truncated,
        "profiled table columns"
    );
    Ok(profile)
}

/// Validate a zero-based unique column index against the table width
///
/// Returns the index as `usize` once it is known to address an existing column.
///
/// # Errors
///
/// [`ProcessingError::NegativeColumnIndex`], [`ProcessingError::ColumnOutOfRange`],
/// plus anything [`profile_columns`] reports.
pub fn validate_unique_column(
    index: i64,
    tree: &MarkupTree,
    table: NodeIndex,
    config: &TrackingConfig,
    deadline: &Deadline<'_>,
) -> ProcessingResult<usize> {
    let Ok(index) = usize::try_from(index) else {
        return Err(ProcessingError::NegativeColumnIndex);
    };

    let profile = profile_columns(tree, table, config, deadline)?;
    if index >= profile.max_columns {
        return Err(ProcessingError::ColumnOutOfRange {
            index,
            columns: profile.max_columns,
        });
    }
    Ok(index)
}
