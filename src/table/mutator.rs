//! Table augmentation
//!
//! Work happens in two passes. Planning resolves every row identifier and
//! enforces the row cap and deadline without touching the tree; applying the
//! plan only adds nodes and attributes, so a failure never leaves a
//! half-augmented table behind.

use super::{RowId, data_rows, first_header_row, resolve_row_id};
use crate::config::TrackingConfig;
use crate::error::{ProcessingError, ProcessingResult, Stage};
use crate::guard::Deadline;
use crate::markup::{ElementData, MarkupTree, NodeIndex, NodeKind};
use crate::utils::{
    CHECKBOX_CELL_CLASS, HEADER_ICON_CLASS, ROW_ID_ATTRIBUTE, TABLE_ID_ATTRIBUTE,
    TABLE_MARKER_CLASS,
};

/// Caller-supplied metadata written into the table
#[derive(Debug, Clone, Copy)]
pub struct MutationOptions<'a> {
    pub table_id: &'a str,
    pub header_label: Option<&'a str>,
    pub unique_column: Option<usize>,
}

/// What [`augment_table`] changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentSummary {
    /// Whether a header row received a leading cell
    pub header_inserted: bool,
    /// Resolved identifiers, one per data row in document order
    pub row_ids: Vec<RowId>,
}

struct MutationPlan {
    header_row: Option<NodeIndex>,
    rows: Vec<(NodeIndex, RowId)>,
}

/// Insert the header cell and one checkbox cell per data row
///
/// # Errors
///
/// [`ProcessingError::MaxRowsExceeded`] when the table has more than
/// `max_rows` data rows, [`ProcessingError::Timeout`] when the deadline trips.
pub fn augment_table(
    tree: &mut MarkupTree,
    table: NodeIndex,
    options: &MutationOptions<'_>,
    config: &TrackingConfig,
    deadline: &Deadline<'_>,
) -> ProcessingResult<AugmentSummary> {
    let plan = plan(tree, table, options, config, deadline)?;
    deadline.check(Stage::Mutation)?;

    if let Some(element) = tree.element_mut(table) {
        element.set_attr(TABLE_ID_ATTRIBUTE, options.table_id);
        element.add_class(TABLE_MARKER_CLASS);
    }

    if let Some(header_row) = plan.header_row {
        insert_header_cell(tree, header_row, options.header_label);
    }

    for (row, id) in &plan.rows {
        if let Some(element) = tree.element_mut(*row) {
            element.set_attr(ROW_ID_ATTRIBUTE, id.as_str());
        }
        insert_checkbox_cell(tree, *row, id);
    }

    Ok(AugmentSummary {
        header_inserted: plan.header_row.is_some(),
        row_ids: plan.rows.into_iter().map(|(_, id)| id).collect(),
    })
}

fn plan(
    tree: &MarkupTree,
    table: NodeIndex,
    options: &MutationOptions<'_>,
    config: &TrackingConfig,
    deadline: &Deadline<'_>,
) -> ProcessingResult<MutationPlan> {
    deadline.check(Stage::Mutation)?;

    let mut rows = Vec::new();
    for (index, row) in data_rows(tree, table).enumerate() {
        deadline.check(Stage::Mutation)?;
        if index >= config.max_rows() {
            return Err(ProcessingError::MaxRowsExceeded {
                limit: config.max_rows(),
            });
        }
        rows.push((row, resolve_row_id(tree, row, index, options.unique_column)));
    }

    Ok(MutationPlan {
        header_row: first_header_row(tree, table),
        rows,
    })
}

fn insert_header_cell(tree: &mut MarkupTree, row: NodeIndex, label: Option<&str>) {
    let th = tree.prepend(row, NodeKind::Element(ElementData::new("th")));
    match label {
        Some(label) => {
            tree.append_text(th, label);
        }
        None => {
            tree.append_element(th, ElementData::new("span").with_attr("class", HEADER_ICON_CLASS));
        }
    }
}

/// Codex CSS-only checkbox, disabled until the client script has loaded state
fn insert_checkbox_cell(tree: &mut MarkupTree, row: NodeIndex, id: &RowId) {
    let cell = tree.prepend(
        row,
        NodeKind::Element(ElementData::new("td").with_attr("class", CHECKBOX_CELL_CLASS)),
    );
    let checkbox = tree.append_element(cell, ElementData::new("div").with_attr("class", "cdx-checkbox"));
    let wrapper = tree.append_element(
        checkbox,
        ElementData::new("div").with_attr("class", "cdx-checkbox__wrapper"),
    );

    tree.append_element(
        wrapper,
        ElementData::new("input")
            .with_attr("type", "checkbox")
            .with_attr("class", "cdx-checkbox__input")
            .with_attr(ROW_ID_ATTRIBUTE, id.as_str())
            .with_attr("id", id.as_str())
            .with_attr("disabled", "disabled"),
    );
    tree.append_element(wrapper, ElementData::new("span").with_attr("class", "cdx-checkbox__icon"));

    let label_container = tree.append_element(
        wrapper,
        ElementData::new("div").with_attr("class", "cdx-checkbox__label cdx-label"),
    );
    let label = tree.append_element(
        label_container,
        ElementData::new("label")
            .with_attr("for", id.as_str())
            .with_attr("class", "cdx-label__label"),
    );
    let text = tree.append_element(
        label,
        ElementData::new("span").with_attr("class", "cdx-label__label__text"),
    );
    tree.append_text(text, " ");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::MonotonicClock;
    use crate::markup::{parse_markup, serialize_node};

    fn augment(markup: &str, options: MutationOptions<'_>, config: &TrackingConfig) -> (ProcessingResult<AugmentSummary>, String) {
        let mut tree = parse_markup(markup);
        let table = tree.find_first(tree.root(), "table").unwrap();
        let clock = MonotonicClock::new();
        let mut deadline = Deadline::new(&clock, config.max_processing_time());
        deadline.start();
        let result = augment_table(&mut tree, table, &options, config, &deadline);
        (result, serialize_node(&tree, table))
    }

    #[test]
    fn test_checkbox_cell_is_first_and_disabled() {
        let options = MutationOptions {
            table_id: "t1",
            header_label: None,
            unique_column: Some(0),
        };
        let (result, html) = augment(
            "<table><tr><th>Name</th></tr><tr><td>Item 7</td></tr></table>",
            options,
            &TrackingConfig::default(),
        );
        let summary = result.unwrap();
        assert!(summary.header_inserted);
        assert_eq!(summary.row_ids, vec![RowId::sanitize("Item_7").unwrap()]);
        assert!(html.contains("<tr data-row-id=\"Item_7\"><td class=\"progress-tracker-checkbox-cell\">"));
        assert!(html.contains("disabled=\"disabled\""));
        assert!(html.contains("<label for=\"Item_7\" class=\"cdx-label__label\">"));
        assert!(html.contains(
            "<tr><th><span class=\"ext-tableProgressTracking-icon-check\"></span></th><th>Name</th></tr>"
        ));
    }

    #[test]
    fn test_header_label_is_text() {
        let options = MutationOptions {
            table_id: "t1",
            header_label: Some("<i>Done</i>"),
            unique_column: None,
        };
        let (result, html) = augment(
            "<table><tr><th>Name</th></tr></table>",
            options,
            &TrackingConfig::default(),
        );
        assert!(result.is_ok());
        assert!(html.contains("<th>&lt;i&gt;Done&lt;/i&gt;</th><th>Name</th>"));
    }

    #[test]
    fn test_row_cap_fails_before_mutation() {
        let options = MutationOptions {
            table_id: "t1",
            header_label: None,
            unique_column: Some(0),
        };
        let config = TrackingConfig::builder().max_rows(1).build().unwrap();
        let (result, html) = augment(
            "<table><tr><td>a</td></tr><tr><td>b</td></tr></table>",
            options,
            &config,
        );
        assert_eq!(result, Err(ProcessingError::MaxRowsExceeded { limit: 1 }));
        assert!(!html.contains("progress-tracker-checkbox-cell"));
        assert!(!html.contains("data-progress-table-id"));
    }
}
