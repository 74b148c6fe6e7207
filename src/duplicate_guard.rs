//! Pre-save check for repeated `table-id` values on one page
//!
//! Runs on raw page source before anything is rendered, so it matches the
//! tag literally instead of parsing the page.

use std::sync::LazyLock;

use ahash::AHashMap;
use regex::Regex;

use crate::error::{ProcessingError, ProcessingResult};
use crate::utils::TAG_NAME;

static TABLE_TAG_ID: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r#"(?i)<{}[^>]*\btable-id\s*=\s*["']?([^"'>\s]+)["']?[^>]*>"#,
        regex::escape(TAG_NAME)
    );
    Regex::new(&pattern).expect("BUG: table-id regex built from a constant tag name is valid")
});

/// Every `table-id` occurring more than once, sorted
#[must_use]
pub fn find_duplicate_table_ids(page_source: &str) -> Vec<String> {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for captures in TABLE_TAG_ID.captures_iter(page_source) {
        if let Some(id) = captures.get(1) {
            *counts.entry(id.as_str()).or_insert(0) += 1;
        }
    }

    let mut duplicates: Vec<String> = counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(id, _)| id.to_string())
        .collect();
    duplicates.sort_unstable();
    duplicates
}

/// Whether any `table-id` occurs more than once
#[must_use]
pub fn has_duplicate_tables(page_source: &str) -> bool {
    !find_duplicate_table_ids(page_source).is_empty()
}

/// Gate for the save hook
///
/// # Errors
///
/// [`ProcessingError::DuplicateTableIds`] listing the repeated ids.
pub fn check_page_save(page_source: &str) -> ProcessingResult<()> {
    let duplicates = find_duplicate_table_ids(page_source);
    if duplicates.is_empty() {
        Ok(())
    } else {
        tracing::info!(ids = ?duplicates, "rejecting save with duplicate progress table ids");
        Err(ProcessingError::DuplicateTableIds(duplicates))
    }
}
