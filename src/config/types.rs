//! Core configuration types for table progress tracking
//!
//! This module contains the `TrackingConfig` struct holding the limits that
//! bound a single render of a progress-tracking table.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::utils::{
    DEFAULT_MAX_ARTICLE_SIZE_KB, DEFAULT_MAX_COLUMNS, DEFAULT_MAX_INPUT_SIZE,
    DEFAULT_MAX_PROCESSING_SECS, DEFAULT_MAX_ROWS,
};

/// Resource limits for processing one tag occurrence
///
/// Supplied by the host environment and immutable for the duration of an
/// invocation. Deserializes from JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Maximum rows examined by the profiler and the row validators
    pub(crate) max_rows: usize,

    /// Maximum cells permitted in any single row
    pub(crate) max_columns: usize,

    /// Maximum length in bytes of the rendered markup
    ///
    /// When unset, 25% of the host-wide article size limit is used.
    pub(crate) max_html_size: Option<usize>,

    /// Wall-clock budget in seconds for one invocation
    pub(crate) max_processing_secs: u64,

    /// Maximum length in bytes of the raw tag content
    pub(crate) max_input_size: usize,

    /// Host-wide article size limit in KiB
    pub(crate) max_article_size_kb: usize,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
            max_html_size: None,
            max_processing_secs: DEFAULT_MAX_PROCESSING_SECS,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
            max_article_size_kb: DEFAULT_MAX_ARTICLE_SIZE_KB,
        }
    }
}

impl TrackingConfig {
    /// Parse a configuration from JSON and validate it
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any limit is zero.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every limit is positive
    ///
    /// # Errors
    ///
    /// Returns an error naming the first zero limit.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("max_rows", self.max_rows),
            ("max_columns", self.max_columns),
            ("max_input_size", self.max_input_size),
            ("max_article_size_kb", self.max_article_size_kb),
            ("max_html_size", self.max_html_size.unwrap_or(1)),
        ];
        for (name, value) in limits {
            if value == 0 {
                bail!("{name} must be greater than zero");
            }
        }
        if self.max_processing_secs == 0 {
            bail!("max_processing_secs must be greater than zero");
        }
        Ok(())
    }
}
