//! # Table Store
//!
//! The rectangular grid of string cells backing the table view.
//! Row 0 is the header; rows keep insertion order.
//!
//! "No selection" is `None` wherever a row or column index is accepted.
//! Reads through a `None` index return an empty string and writes are
//! dropped, so callers can pass the current selection straight through
//! without checking it first.

use crate::core::error::TableError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Checks the table can be painted: it has a header, and every row is
    /// as wide as the header.
    pub fn validate(&self) -> Result<(), TableError> {
        let Some(header) = self.rows.first() else {
            return Err(TableError::NoData);
        };
        let expected = header.len();
        for (row, cells) in self.rows.iter().enumerate().skip(1) {
            if cells.len() != expected {
                return Err(TableError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
        }
        Ok(())
    }

    /// Returns the cell at `(row, col)`, or `""` when either index is `None`.
    ///
    /// # Panics
    ///
    /// Panics if a `Some` index is out of range.
    pub fn get(&self, row: Option<usize>, col: Option<usize>) -> &str {
        match (row, col) {
            (Some(r), Some(c)) => &self.rows[r][c],
            _ => "",
        }
    }

    /// Case-insensitive first match of `name` in the header row.
    pub fn get_index(&self, name: &str) -> Option<usize> {
        self.rows
            .first()?
            .iter()
            .position(|column| column.to_lowercase() == name.to_lowercase())
    }

    /// Replaces a cell in place. A `None` index is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if a `Some` index is out of range.
    pub fn update(&mut self, row: Option<usize>, col: Option<usize>, value: impl Into<String>) {
        if let (Some(r), Some(c)) = (row, col) {
            self.rows[r][c] = value.into();
        }
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Total rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows excluding the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn column_count(&self) -> usize {
        self.header().len()
    }
}

impl From<Vec<Vec<String>>> for TableData {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

impl From<Vec<Vec<&str>>> for TableData {
    fn from(rows: Vec<Vec<&str>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableData {
        TableData::from(vec![
            vec!["KEY", "Status", "SUMMARY"],
            vec!["X-1", "Open", "Fix bug"],
            vec!["X-2", "Done", "Write docs"],
        ])
    }

    #[test]
    fn test_get_index_is_case_insensitive() {
        let data = sample();
        assert_eq!(data.get_index("key"), Some(0));
        assert_eq!(data.get_index("STATUS"), Some(1));
        assert_eq!(data.get_index("Summary"), Some(2));
    }

    #[test]
    fn test_get_index_missing_or_empty() {
        assert_eq!(sample().get_index("ASSIGNEE"), None);
        assert_eq!(TableData::default().get_index("KEY"), None);
    }

    #[test]
    fn test_get_index_first_match_wins() {
        let data = TableData::from(vec![vec!["Name", "NAME"], vec!["a", "b"]]);
        assert_eq!(data.get_index("name"), Some(0));
    }

    #[test]
    fn test_get_with_sentinel_returns_empty() {
        let data = sample();
        assert_eq!(data.get(None, Some(0)), "");
        assert_eq!(data.get(Some(1), None), "");
        assert_eq!(data.get(None, None), "");
        // Never indexes, even on an empty table
        assert_eq!(TableData::default().get(None, None), "");
    }

    #[test]
    fn test_get_cell() {
        let data = sample();
        assert_eq!(data.get(Some(2), Some(2)), "Write docs");
        assert_eq!(data.get(Some(0), Some(0)), "KEY");
    }

    #[test]
    fn test_update_in_place_and_sentinel_noop() {
        let mut data = sample();
        data.update(Some(1), Some(1), "In Progress");
        assert_eq!(data.get(Some(1), Some(1)), "In Progress");

        let before = data.clone();
        data.update(None, Some(1), "ignored");
        data.update(Some(1), None, "ignored");
        assert_eq!(data, before);
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());
        assert!(matches!(
            TableData::default().validate(),
            Err(TableError::NoData)
        ));

        let ragged = TableData::from(vec![vec!["A", "B"], vec!["1"]]);
        assert!(matches!(
            ragged.validate(),
            Err(TableError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_header_only_table_is_valid() {
        let data = TableData::from(vec![vec!["KEY"]]);
        assert!(data.validate().is_ok());
        assert_eq!(data.data_row_count(), 0);
        assert_eq!(data.column_count(), 1);
    }
}
