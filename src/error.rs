//! Error types for progress table processing
//!
//! Every failure is recoverable: the processor converts any of these into an
//! escaped error box rendered in place of the table.

use std::fmt;

use thiserror::Error;

/// Result type alias for processing stages
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Processing stage at which a deadline checkpoint tripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initialising,
    Rendering,
    Parsing,
    ColumnProfiling,
    RowValidation,
    Mutation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Initialising => "initialisation",
            Stage::Rendering => "rendering the table content",
            Stage::Parsing => "parsing the rendered HTML",
            Stage::ColumnProfiling => "checking table columns",
            Stage::RowValidation => "checking row identifiers",
            Stage::Mutation => "adding progress tracking",
        };
        f.write_str(name)
    }
}

/// Terminal failure of one tag invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// Nothing between the opening and closing tags
    #[error("No content found inside the <table-progress-tracking> tag.")]
    EmptyInput,

    /// Raw input exceeds the configured ceiling
    #[error("The table content is {size} bytes, which exceeds the limit of {limit} bytes.")]
    InputTooLarge { size: usize, limit: usize },

    /// The `table-id` argument is missing or empty
    #[error("The table-id argument is required.")]
    MissingTableId,

    /// `unique-column-index` is not an integer
    #[error("unique-column-index must be a whole number, got \"{0}\".")]
    InvalidColumnIndex(String),

    /// The render collaborator failed
    #[error("Rendering the table content failed: {0}")]
    Render(String),

    /// Rendering produced nothing but whitespace
    #[error("Parsing the wikitext resulted in empty HTML.")]
    EmptyOutput,

    /// Rendered markup exceeds the configured ceiling
    #[error("The generated HTML is {size} bytes, which exceeds the limit of {limit} bytes.")]
    OutputTooLarge { size: usize, limit: usize },

    /// The processing budget ran out
    #[error("Processing time limit exceeded during {stage}.")]
    Timeout { stage: Stage },

    /// No `<table>` element in the rendered markup
    #[error(
        "No table was provided for progress tracking. Please include a table between the <table-progress-tracking> tags."
    )]
    NoTableFound,

    /// `unique-column-index` resolved below zero
    #[error("unique-column-index must be 1 or greater.")]
    NegativeColumnIndex,

    /// `unique-column-index` is past the widest row
    #[error(
        "unique-column-index ({index}) is out of range. Table has {columns} columns (0-{}).",
        .columns.saturating_sub(1)
    )]
    ColumnOutOfRange { index: usize, columns: usize },

    /// A row has more cells than allowed
    #[error("The table has too many columns. A maximum of {limit} columns is allowed.")]
    MaxColumnsExceeded { limit: usize },

    /// More data rows than allowed
    #[error("The table has too many rows. A maximum of {limit} rows is allowed.")]
    MaxRowsExceeded { limit: usize },

    /// A data row carries no `data-row-id` and no unique column was given
    #[error(
        "When unique-column-index is not provided, all data rows must have a data-row-id attribute."
    )]
    MissingRowIdentifiers,

    /// The same table-id occurs more than once on a page
    #[error("Each progress tracking table on a page needs a unique table-id. Duplicated: {}.", .0.join(", "))]
    DuplicateTableIds(Vec<String>),
}

impl ProcessingError {
    /// Stable tag identifying the failure reason
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessingError::EmptyInput => "empty_input",
            ProcessingError::InputTooLarge { .. } => "input_too_large",
            ProcessingError::MissingTableId => "missing_table_id",
            ProcessingError::InvalidColumnIndex(_) => "invalid_column_index",
            ProcessingError::Render(_) => "render",
            ProcessingError::EmptyOutput => "empty_output",
            ProcessingError::OutputTooLarge { .. } => "output_too_large",
            ProcessingError::Timeout { .. } => "timeout",
            ProcessingError::NoTableFound => "no_table_found",
            ProcessingError::NegativeColumnIndex => "negative_column_index",
            ProcessingError::ColumnOutOfRange { .. } => "column_out_of_range",
            ProcessingError::MaxColumnsExceeded { .. } => "max_columns_exceeded",
            ProcessingError::MaxRowsExceeded { .. } => "max_rows_exceeded",
            ProcessingError::MissingRowIdentifiers => "missing_row_identifiers",
            ProcessingError::DuplicateTableIds(_) => "duplicate_table_ids",
        }
    }

    /// Whether the host should stop caching the page
    ///
    /// A missing table is often transient while an author is mid-edit.
    #[must_use]
    pub fn disables_cache(&self) -> bool {
        matches!(self, ProcessingError::NoTableFound)
    }
}

impl From<anyhow::Error> for ProcessingError {
    fn from(error: anyhow::Error) -> Self {
        ProcessingError::Render(error.to_string())
    }
}

/// Render a message inside the host's error box
///
/// The message is escaped, so row content or configuration strings that
/// ended up in it cannot inject markup.
#[must_use]
pub fn render_error_box(message: &str) -> String {
    format!(
        "<div class=\"cdx-message cdx-message--block cdx-message--error\">\
         <span class=\"cdx-message__icon\"></span>\
         <div class=\"cdx-message__content\">{}</div></div>",
        html_escape::encode_text(message)
    )
}
