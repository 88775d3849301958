//! # Errors
//!
//! Only two things in the table core can genuinely fail: painting a table
//! with nothing in it, and the caller's move handler. Everything else
//! degrades to a sentinel (`None`, empty string) so the UI keeps working
//! when a column is missing or nothing is selected yet.

use std::fmt;

/// Errors surfaced to the caller of `Table::paint`.
#[derive(Debug)]
pub enum TableError {
    /// `paint` was called with no rows at all. Nothing is shown.
    NoData,
    /// A row's cell count differs from the header row.
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Terminal setup, draw, or suspend failed.
    Io(std::io::Error),
    /// A background task died unexpectedly. The render loop stops.
    Fatal(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::NoData => write!(f, "no data"),
            TableError::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {row} has {found} cells, header has {expected}"
            ),
            TableError::Io(e) => write!(f, "terminal error: {e}"),
            TableError::Fatal(msg) => write!(f, "background task failed: {msg}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        TableError::Io(e)
    }
}

/// A descriptive failure returned by a transition handler.
///
/// The message is shown verbatim in the action modal footer as
/// `Error: <message>`, so it should read well on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HandlerError {}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Failure to produce the text for the detail pager.
#[derive(Debug)]
pub enum DetailError {
    /// The record could not be fetched.
    Fetch(String),
    /// The record was fetched but could not be rendered.
    Render(String),
}

impl fmt::Display for DetailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailError::Fetch(msg) => write!(f, "fetch error: {msg}"),
            DetailError::Render(msg) => write!(f, "render error: {msg}"),
        }
    }
}

impl std::error::Error for DetailError {}
