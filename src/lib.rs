//! Trackview library exports
//!
//! An interactive terminal table for lists of records, with keyboard
//! navigation, a detail pager, a guided "transition" menu, and screen reader
//! narration of every state change.

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

pub use crate::core::error::{DetailError, HandlerError, TableError};
pub use crate::core::hooks::TableHooks;
pub use crate::core::table::TableData;
pub use crate::tui::{Exit, Table};
