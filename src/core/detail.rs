//! # Detail View
//!
//! Fetches and renders the long-form view of a record, off the render thread.
//! The rendered text is handed back to the render loop, which suspends the
//! terminal and pipes it through the pager.

use async_trait::async_trait;
use log::{info, warn};
use std::sync::{Arc, mpsc};

use crate::core::action::{Action, FlowId};
use crate::core::error::DetailError;
use crate::core::table::TableData;

#[async_trait]
pub trait DetailSource: Send + Sync {
    /// Produces the pager text for the record at `(row, col)`.
    ///
    /// `data` is a snapshot of the table taken when the key was pressed.
    async fn render(&self, row: usize, col: usize, data: TableData) -> Result<String, DetailError>;
}

/// Renders the detail text and asks the render loop to page it, then hides
/// the "please wait" overlay.
///
/// A render failure skips the pager. If the user cancels while this runs,
/// the render loop drops both messages.
pub async fn run_detail(
    flow: FlowId,
    source: Arc<dyn DetailSource>,
    row: usize,
    col: usize,
    data: TableData,
    tx: mpsc::Sender<Action>,
) {
    match source.render(row, col, data).await {
        Ok(text) => {
            info!("Detail view {:?} ready ({} bytes)", flow, text.len());
            if tx.send(Action::DetailReady { flow, text }).is_err() {
                warn!("Failed to post detail text: receiver dropped");
                return;
            }
        }
        Err(e) => warn!("Detail view for row {} failed: {}", row, e),
    }
    if tx.send(Action::DetailFinished { flow }).is_err() {
        warn!("Failed to hide detail overlay: receiver dropped");
    }
}
