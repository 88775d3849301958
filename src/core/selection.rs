//! # Selection Tracker
//!
//! Holds the `(row, column)` cursor. Row 0 is the header and is never
//! selectable. Moving to a different row narrates that row; moving only the
//! column does not.

use crate::core::announce::Announcer;
use crate::core::narration;
use crate::core::table::TableData;

#[derive(Debug, Clone)]
pub struct SelectionTracker {
    row: Option<usize>,
    col: Option<usize>,
    announcer: Announcer,
}

impl SelectionTracker {
    /// Starts on the first data row, or with nothing selected when the table
    /// has only a header.
    pub fn new(data: &TableData, announcer: Announcer) -> Self {
        let (row, col) = if data.data_row_count() > 0 && data.column_count() > 0 {
            (Some(1), Some(0))
        } else {
            (None, None)
        };
        Self { row, col, announcer }
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn col(&self) -> Option<usize> {
        self.col
    }

    pub fn current(&self) -> (Option<usize>, Option<usize>) {
        (self.row, self.col)
    }

    /// Moves the cursor, clamped to the data rows and columns.
    ///
    /// Returns `true` if the row changed, in which case the new row has been
    /// announced.
    pub fn select(&mut self, data: &TableData, row: usize, col: usize) -> bool {
        let rows = data.data_row_count();
        let cols = data.column_count();
        if rows == 0 || cols == 0 {
            return false;
        }
        let row = row.clamp(1, rows);
        let col = col.min(cols - 1);

        let row_changed = self.row != Some(row);
        self.row = Some(row);
        self.col = Some(col);
        if row_changed {
            self.narrate(data);
        }
        row_changed
    }

    /// Moves the cursor by a signed offset. Saturates at the edges.
    pub fn move_by(&mut self, data: &TableData, rows: isize, cols: isize) -> bool {
        let (Some(row), Some(col)) = (self.row, self.col) else {
            return false;
        };
        self.select(
            data,
            row.saturating_add_signed(rows),
            col.saturating_add_signed(cols),
        )
    }

    pub fn first(&mut self, data: &TableData) -> bool {
        let col = self.col.unwrap_or(0);
        self.select(data, 1, col)
    }

    pub fn last(&mut self, data: &TableData) -> bool {
        let col = self.col.unwrap_or(0);
        self.select(data, data.data_row_count(), col)
    }

    /// Re-applies the bounds after the table changed underneath the cursor.
    /// Stays silent.
    pub fn clamp_to(&mut self, data: &TableData) {
        let rows = data.data_row_count();
        let cols = data.column_count();
        if rows == 0 || cols == 0 {
            self.row = None;
            self.col = None;
            return;
        }
        self.row = Some(self.row.unwrap_or(1).clamp(1, rows));
        self.col = Some(self.col.unwrap_or(0).min(cols - 1));
    }

    /// Announces the currently selected row, if any.
    pub fn narrate(&self, data: &TableData) {
        if let Some(text) = self.row.and_then(|row| narration::selection(data, row)) {
            self.announcer.announce(text);
        }
    }
}
