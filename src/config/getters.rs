//! Getter methods for `TrackingConfig`

use std::time::Duration;

use super::types::TrackingConfig;
use crate::utils::HTML_SIZE_SHARE_DIVISOR;

impl TrackingConfig {
    #[must_use]
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    #[must_use]
    pub fn max_columns(&self) -> usize {
        self.max_columns
    }

    /// Ceiling on rendered markup length in bytes
    ///
    /// Falls back to a quarter of the article size limit when unset.
    #[must_use]
    pub fn max_html_size(&self) -> usize {
        self.max_html_size.unwrap_or_else(|| {
            self.max_article_size_kb.saturating_mul(1024) / HTML_SIZE_SHARE_DIVISOR
        })
    }

    #[must_use]
    pub fn max_processing_time(&self) -> Duration {
        Duration::from_secs(self.max_processing_secs)
    }

    #[must_use]
    pub fn max_input_size(&self) -> usize {
        self.max_input_size
    }

    #[must_use]
    pub fn max_article_size_kb(&self) -> usize {
        self.max_article_size_kb
    }
}
