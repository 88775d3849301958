//! # Actions
//!
//! Background tasks don't mutate the UI. They post an `Action` onto the
//! render loop's queue, and the loop applies it here on the render thread:
//!
//! ```text
//! App + Action  →  update()  →  mutated App + Effect
//! ```
//!
//! The queue has one consumer, so actions apply in the order they were
//! posted, and so do the announcements they trigger.
//!
//! Transition and detail actions carry the id of the flow that produced
//! them. If that flow is no longer the open one (the user cancelled it), the
//! action is dropped.

use log::debug;

use crate::core::narration;
use crate::core::page::Page;
use crate::core::state::{App, FooterTone};
use crate::core::transition::{StateRefresh, TransitionPhase};

/// Identifies one run of a background flow (transition or detail view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowId(pub u64);

#[derive(Debug)]
pub enum Action {
    /// Narrate free text.
    Announce(String),
    /// Narrate the currently selected row.
    NarrateSelection,
    /// The detail text is ready; suspend the terminal and page it.
    DetailReady { flow: FlowId, text: String },
    /// The detail flow is over; take down the "please wait" overlay.
    DetailFinished { flow: FlowId },
    /// The flow's options are ready; make the menu interactive.
    TransitionOptions {
        flow: FlowId,
        key: String,
        states: Vec<String>,
        focus: usize,
    },
    /// The handler rejected the chosen state.
    TransitionFailed { flow: FlowId, message: String },
    /// The handler accepted the chosen state.
    TransitionSucceeded {
        flow: FlowId,
        key: String,
        state: String,
        refresh: Option<StateRefresh>,
    },
    /// A background task died.
    Fatal(String),
}

/// What the render loop must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Suspend the surface and page the text.
    PageOut(String),
    /// Stop the loop and fail the paint.
    Fatal(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Announce(text) => {
            app.announce(text);
            Effect::None
        }
        Action::NarrateSelection => {
            app.selection.narrate(&app.data);
            Effect::None
        }
        Action::DetailReady { flow, text } => {
            if app.detail != Some(flow) {
                debug!("Dropping detail text for stale flow {:?}", flow);
                return Effect::None;
            }
            Effect::PageOut(text)
        }
        Action::DetailFinished { flow } => {
            if app.detail != Some(flow) {
                debug!("Dropping detail finish for stale flow {:?}", flow);
                return Effect::None;
            }
            app.detail = None;
            app.pages.hide(Page::Secondary);
            Effect::None
        }
        Action::TransitionOptions {
            flow,
            key,
            states,
            focus,
        } => {
            let Some(modal) = app.modal_for(flow) else {
                debug!("Dropping options for stale flow {:?}", flow);
                return Effect::None;
            };
            modal.prompt = narration::transition_prompt(&key);
            modal.focus = focus.min(states.len().saturating_sub(1));
            modal.options = states;
            modal.key = key;
            modal.phase = TransitionPhase::AwaitingChoice;

            let announcement = narration::transition_menu(&modal.key, &modal.options);
            app.pages.hide(Page::Secondary);
            app.pages.send_to_front(Page::Action);
            app.announce(announcement);
            Effect::None
        }
        Action::TransitionFailed { flow, message } => {
            let Some(modal) = app.modal_for(flow) else {
                debug!("Dropping failure for stale flow {:?}", flow);
                return Effect::None;
            };
            let footer = narration::transition_error(&message);
            modal.footer = footer.clone();
            modal.footer_tone = FooterTone::Error;
            modal.phase = TransitionPhase::AwaitingChoice;
            app.announce(footer);
            Effect::None
        }
        Action::TransitionSucceeded {
            flow,
            key,
            state,
            refresh,
        } => {
            let Some(modal) = app.modal_for(flow) else {
                debug!("Dropping success for stale flow {:?}", flow);
                return Effect::None;
            };
            let (row, col) = (modal.row, modal.col);
            app.transition = None;
            app.pages.hide(Page::Action);
            app.announce(narration::transitioned(&key, &state));

            if let Some(refresh) = refresh {
                refresh.apply(&mut app.data, row, col, &state);
            }
            app.repaint();
            Effect::None
        }
        Action::Fatal(message) => Effect::Fatal(message),
    }
}
