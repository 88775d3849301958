//! # Transition Flow
//!
//! The "move" action: pick a new state for the selected record from a menu.
//!
//! ```text
//! Idle ──m──► OptionsShown ──options arrive──► AwaitingChoice ──Enter──► Processing
//!   ▲              │                              ▲    │                    │
//!   │              └──────── Esc / q ─────────────┼────┘                    │
//!   │                                             └──── handler error ──────┤
//!   └──────────────────────────── handler ok ───────────────────────────────┘
//! ```
//!
//! `Idle` is the absence of a modal (`App::transition == None`). The render
//! thread owns the modal; the flow below runs as a background task and talks
//! to it only through two channels: [`ModalChoice`] values come in, and
//! [`Action`] messages go out.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::fmt;
use std::sync::{Arc, mpsc};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::action::{Action, FlowId};
use crate::core::error::HandlerError;
use crate::core::table::TableData;

/// Performs the transition to the chosen state.
#[async_trait]
pub trait TransitionHandler: Send + Sync {
    async fn transition(&self, state: &str) -> Result<(), HandlerError>;
}

/// Builds a [`TransitionRequest`] for the record at `(row, col)`.
///
/// Typically fetches the record's available transitions from a remote
/// tracker, so it runs off the render thread.
#[async_trait]
pub trait TransitionSource: Send + Sync {
    async fn prepare(&self, row: usize, col: usize) -> TransitionRequest;
}

/// Writes the new state back into the table after a successful transition.
#[derive(Clone)]
pub struct StateRefresh(Arc<dyn Fn(&mut TableData, usize, usize, &str) + Send + Sync>);

impl StateRefresh {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut TableData, usize, usize, &str) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, data: &mut TableData, row: usize, col: usize, state: &str) {
        (self.0)(data, row, col, state)
    }
}

impl fmt::Debug for StateRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StateRefresh(..)")
    }
}

/// One invocation of the move action.
pub struct TransitionRequest {
    pub key: String,
    /// Unique by label, in menu order.
    pub candidate_states: Vec<String>,
    pub current_state: Option<String>,
    pub handler: Arc<dyn TransitionHandler>,
    pub on_success: Option<StateRefresh>,
}

impl TransitionRequest {
    /// Duplicate labels are dropped, keeping the first occurrence.
    pub fn new<I, S>(key: impl Into<String>, states: I, handler: Arc<dyn TransitionHandler>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut candidate_states: Vec<String> = Vec::new();
        for state in states {
            let state = state.into();
            if !candidate_states.contains(&state) {
                candidate_states.push(state);
            }
        }
        Self {
            key: key.into(),
            candidate_states,
            current_state: None,
            handler,
            on_success: None,
        }
    }

    pub fn with_current_state(mut self, state: impl Into<String>) -> Self {
        self.current_state = Some(state.into());
        self
    }

    pub fn with_refresh(mut self, refresh: StateRefresh) -> Self {
        self.on_success = Some(refresh);
        self
    }

    pub fn default_focus(&self) -> usize {
        default_focus(&self.candidate_states, self.current_state.as_deref())
    }
}

/// Index of the first option equal to `current`, else 0.
pub fn default_focus(states: &[String], current: Option<&str>) -> usize {
    current
        .and_then(|current| states.iter().position(|s| s == current))
        .unwrap_or(0)
}

/// Where the modal is while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Overlay shown, options still loading.
    OptionsShown,
    /// Buttons are interactive.
    AwaitingChoice,
    /// The handler is running. Input is ignored until it returns.
    Processing,
}

/// What the user did with the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalChoice {
    Chosen(String),
    Cancel,
}

fn post(tx: &mpsc::Sender<Action>, action: Action) -> bool {
    if tx.send(action).is_err() {
        warn!("Failed to post transition action: receiver dropped");
        return false;
    }
    true
}

/// Runs one transition flow to completion.
///
/// Returns when the handler succeeds, the user cancels, or the modal goes
/// away (the choice channel closes). A handler error is reported and the
/// flow keeps waiting for another choice.
pub async fn run_flow(
    flow: FlowId,
    source: Arc<dyn TransitionSource>,
    row: usize,
    col: usize,
    mut choices: UnboundedReceiver<ModalChoice>,
    tx: mpsc::Sender<Action>,
) {
    let request = source.prepare(row, col).await;
    info!(
        "Transition {:?} for {}: {} options",
        flow,
        request.key,
        request.candidate_states.len()
    );

    let focus = request.default_focus();
    if !post(
        &tx,
        Action::TransitionOptions {
            flow,
            key: request.key.clone(),
            states: request.candidate_states.clone(),
            focus,
        },
    ) {
        return;
    }

    while let Some(choice) = choices.recv().await {
        let state = match choice {
            ModalChoice::Chosen(state) => state,
            ModalChoice::Cancel => {
                debug!("Transition {:?} cancelled", flow);
                return;
            }
        };

        match request.handler.transition(&state).await {
            Ok(()) => {
                info!("Transition {:?}: {} -> {}", flow, request.key, state);
                post(
                    &tx,
                    Action::TransitionSucceeded {
                        flow,
                        key: request.key.clone(),
                        state,
                        refresh: request.on_success.clone(),
                    },
                );
                return;
            }
            Err(e) => {
                warn!("Transition {:?} to {} failed: {}", flow, state, e);
                if !post(
                    &tx,
                    Action::TransitionFailed {
                        flow,
                        message: e.to_string(),
                    },
                ) {
                    return;
                }
            }
        }
    }
    debug!("Transition {:?} closed without a choice", flow);
}
