//! Entry point for one `<table-progress-tracking>` tag occurrence
//!
//! Flow: input guard → render → parse → column profile (unique column given)
//! or row-id validation (no unique column) → augment → serialize. The first
//! failing stage ends processing; [`ProgressTableProcessor::process`] turns
//! that failure into an escaped error box so the caller always gets markup.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::TrackingConfig;
use crate::error::{ProcessingError, ProcessingResult, Stage, render_error_box};
use crate::guard::{Clock, Deadline, MonotonicClock, check_input_size};
use crate::markup::{parse_markup, serialize_node};
use crate::table::{MutationOptions, augment_table, validate_row_ids, validate_unique_column};
use crate::utils::TRACKING_CATEGORY;

/// Host rendering engine and page-output sink
pub trait RenderHost {
    /// Turn the raw tag content into HTML
    ///
    /// # Errors
    ///
    /// Any error is reported to the author in place of the table.
    fn render(&mut self, raw: &str) -> Result<String>;

    /// Stop caching the page currently being rendered
    fn disable_cache(&mut self) {}

    /// Record a tracking category on the page
    fn add_tracking_category(&mut self, _category: &str) {}
}

/// [`RenderHost`] for content that is already HTML
///
/// Records the signals a real host would act on.
#[derive(Debug, Clone, Default)]
pub struct PassthroughHost {
    pub cache_disabled: bool,
    pub tracking_categories: Vec<String>,
}

impl RenderHost for PassthroughHost {
    fn render(&mut self, raw: &str) -> Result<String> {
        Ok(raw.to_string())
    }

    fn disable_cache(&mut self) {
        self.cache_disabled = true;
    }

    fn add_tracking_category(&mut self, category: &str) {
        if !self.tracking_categories.iter().any(|c| c == category) {
            self.tracking_categories.push(category.to_string());
        }
    }
}

/// Parsed tag attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagArguments {
    pub table_id: String,
    /// Zero-based; may be negative when the author wrote `0` or less
    pub unique_column_index: Option<i64>,
    pub header_label: Option<String>,
}

impl TagArguments {
    #[must_use]
    pub fn new(table_id: impl Into<String>) -> Self {
        Self {
            table_id: table_id.into(),
            unique_column_index: None,
            header_label: None,
        }
    }

    /// Set the unique column from its one-based tag value
    #[must_use]
    pub fn with_unique_column(mut self, one_based: i64) -> Self {
        self.unique_column_index = Some(one_based.saturating_sub(1));
        self
    }

    #[must_use]
    pub fn with_header_label(mut self, label: impl Into<String>) -> Self {
        self.header_label = Some(label.into());
        self
    }

    /// Read `table-id`, `unique-column-index` and `header-label`
    ///
    /// An empty `header-label` counts as absent. A missing `table-id` is
    /// reported later so the input size check still runs first.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::InvalidColumnIndex`] for a non-numeric column.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> ProcessingResult<Self> {
        let unique_column_index = attributes
            .get("unique-column-index")
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map(|one_based| one_based.saturating_sub(1))
                    .map_err(|_| ProcessingError::InvalidColumnIndex(raw.clone()))
            })
            .transpose()?;

        Ok(Self {
            table_id: attributes.get("table-id").cloned().unwrap_or_default(),
            unique_column_index,
            header_label: attributes
                .get("header-label")
                .filter(|label| !label.is_empty())
                .cloned(),
        })
    }
}

/// Processes tag occurrences under a fixed configuration
pub struct ProgressTableProcessor<'a> {
    config: &'a TrackingConfig,
    clock: &'a dyn Clock,
}

static SYSTEM_CLOCK: std::sync::LazyLock<MonotonicClock> =
    std::sync::LazyLock::new(MonotonicClock::new);

impl<'a> ProgressTableProcessor<'a> {
    #[must_use]
    pub fn new(config: &'a TrackingConfig) -> Self {
        Self {
            config,
            clock: &*SYSTEM_CLOCK,
        }
    }

    /// Use a custom clock for deadline checkpoints
    #[must_use]
    pub fn with_clock(mut self, clock: &'a dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Process raw tag attributes; see [`ProgressTableProcessor::process`]
    pub fn process_tag<H: RenderHost + ?Sized>(
        &self,
        host: &mut H,
        raw: &str,
        attributes: &HashMap<String, String>,
    ) -> String {
        match TagArguments::from_attributes(attributes) {
            Ok(args) => self.process(host, raw, &args),
            Err(err) => {
                warn!(error = %err, "invalid progress table arguments");
                render_error_box(&err.to_string())
            }
        }
    }

    /// Augmented table markup, or an error box describing why not
    pub fn process<H: RenderHost + ?Sized>(
        &self,
        host: &mut H,
        raw: &str,
        args: &TagArguments,
    ) -> String {
        match self.try_process(host, raw, args) {
            Ok(html) => html,
            Err(err) => {
                warn!(kind = err.kind(), table_id = %args.table_id, error = %err, "progress table rejected");
                render_error_box(&err.to_string())
            }
        }
    }

    /// Run every stage, stopping at the first failure
    ///
    /// Errors that may clear up on a later edit also turn off page caching.
    ///
    /// # Errors
    ///
    /// Any [`ProcessingError`] raised by a stage.
    pub fn try_process<H: RenderHost + ?Sized>(
        &self,
        host: &mut H,
        raw: &str,
        args: &TagArguments,
    ) -> ProcessingResult<String> {
        let result = self.run_stages(host, raw, args);
        if result.as_ref().is_err_and(ProcessingError::disables_cache) {
            host.disable_cache();
        }
        result
    }

    fn run_stages<H: RenderHost + ?Sized>(
        &self,
        host: &mut H,
        raw: &str,
        args: &TagArguments,
    ) -> ProcessingResult<String> {
        if raw.is_empty() {
            return Err(ProcessingError::EmptyInput);
        }
        check_input_size(raw, self.config.max_input_size())?;
        if args.table_id.is_empty() {
            return Err(ProcessingError::MissingTableId);
        }

        let mut deadline = Deadline::new(self.clock, self.config.max_processing_time());
        deadline.start();
        deadline.check(Stage::Initialising)?;

        let rendered = host.render(raw)?;
        deadline.check(Stage::Rendering)?;

        if rendered.trim().is_empty() {
            return Err(ProcessingError::EmptyOutput);
        }
        let limit = self.config.max_html_size();
        if rendered.len() > limit {
            return Err(ProcessingError::OutputTooLarge {
                size: rendered.len(),
                limit,
            });
        }

        let mut tree = parse_markup(&rendered);
        deadline.check(Stage::Parsing)?;

        let Some(table) = tree.find_first(tree.root(), "table") else {
            return Err(ProcessingError::NoTableFound);
        };
        debug!(table_id = %args.table_id, nodes = tree.len(), "located progress table");

        let unique_column = match args.unique_column_index {
            Some(index) => Some(validate_unique_column(
                index,
                &tree,
                table,
                self.config,
                &deadline,
            )?),
            None => {
                validate_row_ids(&tree, table, self.config, &deadline)?;
                None
            }
        };

        let options = MutationOptions {
            table_id: &args.table_id,
            header_label: args.header_label.as_deref().filter(|label| !label.is_empty()),
            unique_column,
        };
        let summary = augment_table(&mut tree, table, &options, self.config, &deadline)?;
        debug!(
            table_id = %args.table_id,
            rows = summary.row_ids.len(),
            header = summary.header_inserted,
            "augmented progress table"
        );

        host.add_tracking_category(TRACKING_CATEGORY);
        Ok(serialize_node(&tree, table))
    }
}
