//! # Narration Text
//!
//! Every string the screen reader hears is composed here. Nothing is stored:
//! announcements are derived from the table and the selection at the moment
//! they are needed.

use crate::core::table::TableData;

pub const HELP_OPENED: &str = "Help screen opened. Press q or Escape to close.";
pub const COPIED: &str = "Copied to clipboard";
pub const MODAL_INSTRUCTIONS: &str =
    "Use TAB or ← → to navigate, ENTER to select, ESC or q to cancel.";
pub const PROCESSING: &str = "Processing. Please wait...";
pub const TRANSITION_CANCELLED: &str = "Transition cancelled";
pub const DETAIL_CANCELLED: &str = "Detail view cancelled";
pub const ACCESSIBILITY_HELP: &str = "Accessibility shortcuts: Control+S to speak current cell, \
    Control+A for this help, Arrow keys to navigate, Tab to move between sections.";

/// `"<r> of <n>: <first column>[, <status>][, <summary>]"` for data row `row`.
///
/// Returns `None` for the header row or a row past the end, which is how a
/// header-only table stays silent.
pub fn selection(data: &TableData, row: usize) -> Option<String> {
    if row == 0 {
        return None;
    }
    let cells = data.row(row)?;
    let key = cells.first()?;

    let mut text = format!("{} of {}: {}", row, data.data_row_count(), key);
    for column in ["STATUS", "SUMMARY"] {
        if let Some(value) = data.get_index(column).and_then(|c| cells.get(c)) {
            text.push_str(", ");
            text.push_str(value);
        }
    }
    Some(text)
}

/// `"Row R, Column C (Header): Value"` for the cell under the cursor.
pub fn cell(data: &TableData, row: usize, col: usize) -> Option<String> {
    if row >= data.row_count() || col >= data.column_count() {
        return None;
    }
    let header = &data.header()[col];
    let value = data.get(Some(row), Some(col));
    Some(format!("Row {row}, Column {col} ({header}): {value}"))
}

pub fn viewing_details(key: &str) -> String {
    format!("Viewing details for {key}")
}

pub fn transition_menu(key: &str, states: &[String]) -> String {
    format!(
        "Transition menu for {key}. Available options: {}",
        states.join(", ")
    )
}

pub fn transition_prompt(key: &str) -> String {
    format!("Select desired state to transition {key} to:")
}

pub fn transition_error(message: &str) -> String {
    format!("Error: {message}")
}

pub fn transitioned(key: &str, state: &str) -> String {
    format!("Successfully transitioned {key} to {state}")
}
