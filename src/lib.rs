pub mod config;
pub mod duplicate_guard;
pub mod error;
pub mod guard;
pub mod markup;
pub mod processor;
pub mod progress;
pub mod table;
pub mod utils;

pub use config::TrackingConfig;
pub use duplicate_guard::{check_page_save, find_duplicate_table_ids, has_duplicate_tables};
pub use error::{ProcessingError, ProcessingResult, Stage, render_error_box};
pub use guard::{Clock, Deadline, MonotonicClock};
pub use processor::{PassthroughHost, ProgressTableProcessor, RenderHost, TagArguments};
pub use progress::{ApiResponse, Caller, MemoryProgressStore, ProgressApi, ProgressKey, ProgressStore};
pub use table::RowId;

use std::collections::HashMap;

/// Render one tag occurrence with the system clock
///
/// Always returns markup: the augmented table or an escaped error box.
pub fn render_progress_table<H: RenderHost + ?Sized>(
    host: &mut H,
    raw: &str,
    attributes: &HashMap<String, String>,
    config: &TrackingConfig,
) -> String {
    ProgressTableProcessor::new(config).process_tag(host, raw, attributes)
}
