//! Shared constants for table progress tracking
//!
//! Default limits and the attribute, class and category names that the
//! client-side script and stylesheet depend on.

/// Default maximum number of rows examined before bailing: 1000
///
/// Progress tables list collectibles, achievements and similar inventories.
/// Hand-maintained tables rarely exceed a few hundred rows.
pub const DEFAULT_MAX_ROWS: usize = 1000;

/// Default maximum number of cells in any single row: 50
pub const DEFAULT_MAX_COLUMNS: usize = 50;

/// Default processing budget for one tag occurrence: 5 seconds
pub const DEFAULT_MAX_PROCESSING_SECS: u64 = 5;

/// Default maximum raw input size: 50 KiB
pub const DEFAULT_MAX_INPUT_SIZE: usize = 50 * 1024;

/// Default host-wide article size limit in KiB
///
/// Used to derive the rendered markup ceiling when none is configured.
pub const DEFAULT_MAX_ARTICLE_SIZE_KB: usize = 2048;

/// Share of the article size limit granted to rendered markup (25%)
pub const HTML_SIZE_SHARE_DIVISOR: usize = 4;

/// Attribute carrying the caller's table identifier on the `<table>` element
pub const TABLE_ID_ATTRIBUTE: &str = "data-progress-table-id";

/// Attribute carrying a row identifier on rows, cells and checkboxes
pub const ROW_ID_ATTRIBUTE: &str = "data-row-id";

/// Class appended to every processed table
pub const TABLE_MARKER_CLASS: &str = "progress-tracking-table";

/// Class of the inserted checkbox cell
pub const CHECKBOX_CELL_CLASS: &str = "progress-tracker-checkbox-cell";

/// Class of the placeholder icon in the default header cell
pub const HEADER_ICON_CLASS: &str = "ext-tableProgressTracking-icon-check";

/// Tracking category signalled to the host after a successful render
pub const TRACKING_CATEGORY: &str = "tpt-tracking-category";

/// Name of the wiki tag this crate implements
pub const TAG_NAME: &str = "table-progress-tracking";

/// Prefix of identifiers derived from a row's position
pub const FALLBACK_ROW_ID_PREFIX: &str = "row_";
