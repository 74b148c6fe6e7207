//! Fluent builder for `TrackingConfig`
//!
//! Every field starts at its default; `build()` validates the result so a
//! zero limit never reaches the processor.

use anyhow::Result;

use super::types::TrackingConfig;

#[derive(Debug, Clone, Default)]
pub struct TrackingConfigBuilder {
    config: TrackingConfig,
}

impl TrackingConfig {
    /// Create a builder for configuring a `TrackingConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> TrackingConfigBuilder {
        TrackingConfigBuilder::default()
    }
}

impl TrackingConfigBuilder {
    #[must_use]
    pub fn max_rows(mut self, max_rows: usize) -> Self {
        self.config.max_rows = max_rows;
        self
    }

    #[must_use]
    pub fn max_columns(mut self, max_columns: usize) -> Self {
        self.config.max_columns = max_columns;
        self
    }

    #[must_use]
    pub fn max_html_size(mut self, bytes: usize) -> Self {
        self.config.max_html_size = Some(bytes);
        self
    }

    #[must_use]
    pub fn max_processing_secs(mut self, secs: u64) -> Self {
        self.config.max_processing_secs = secs;
        self
    }

    #[must_use]
    pub fn max_input_size(mut self, bytes: usize) -> Self {
        self.config.max_input_size = bytes;
        self
    }

    #[must_use]
    pub fn max_article_size_kb(mut self, kb: usize) -> Self {
        self.config.max_article_size_kb = kb;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is zero.
    pub fn build(self) -> Result<TrackingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
