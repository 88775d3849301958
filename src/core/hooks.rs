//! # Caller Hooks
//!
//! The table knows nothing about the records it shows. Everything
//! domain-specific (what "copy" copies, what the detail view says, which
//! states a record can move to) is supplied by the caller through these
//! hooks. Every hook is optional; a key whose hook is missing does nothing.

use std::sync::Arc;

use crate::core::detail::DetailSource;
use crate::core::table::TableData;
use crate::core::transition::TransitionSource;

/// Called on the render thread with the selected `(row, col)` and the table.
pub type CellFunc = Arc<dyn Fn(usize, usize, &TableData) + Send + Sync>;

/// Called after the terminal has been released.
pub type RefreshFunc = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone, Default)]
pub struct TableHooks {
    /// Enter.
    pub selected: Option<CellFunc>,
    /// `v`.
    pub detail: Option<Arc<dyn DetailSource>>,
    /// `m`.
    pub transition: Option<Arc<dyn TransitionSource>>,
    /// Ctrl+R / F5.
    pub refresh: Option<RefreshFunc>,
    /// `c`.
    pub copy: Option<CellFunc>,
    /// Ctrl+K.
    pub copy_key: Option<CellFunc>,
}

impl TableHooks {
    pub fn with_selected<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize, &TableData) + Send + Sync + 'static,
    {
        self.selected = Some(Arc::new(f));
        self
    }

    pub fn with_detail(mut self, source: Arc<dyn DetailSource>) -> Self {
        self.detail = Some(source);
        self
    }

    pub fn with_transition(mut self, source: Arc<dyn TransitionSource>) -> Self {
        self.transition = Some(source);
        self
    }

    pub fn with_refresh<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.refresh = Some(Arc::new(f));
        self
    }

    pub fn with_copy<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize, &TableData) + Send + Sync + 'static,
    {
        self.copy = Some(Arc::new(f));
        self
    }

    pub fn with_copy_key<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize, &TableData) + Send + Sync + 'static,
    {
        self.copy_key = Some(Arc::new(f));
        self
    }
}
