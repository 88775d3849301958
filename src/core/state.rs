//! # Application State
//!
//! Everything the render thread owns, in one place.
//!
//! ```text
//! App
//! ├── data: TableData                    // the grid, row 0 = header
//! ├── selection: SelectionTracker        // (row, col) cursor
//! ├── pages: PageStack                   // visible overlays, back to front
//! ├── footer_text / help_text: String    // static texts from the caller
//! ├── transition: Option<TransitionModal> // None = idle
//! ├── detail: Option<FlowId>             // detail view still loading
//! ├── announcer: Announcer               // no-op unless accessibility is on
//! └── paint_count: u64                   // bumped on every full re-render
//! ```
//!
//! Background tasks never touch this directly. They post `Action`s that the
//! render loop applies through `update()` in action.rs.

use log::debug;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::core::action::FlowId;
use crate::core::announce::Announcer;
use crate::core::narration;
use crate::core::page::{Page, PageStack};
use crate::core::selection::SelectionTracker;
use crate::core::table::TableData;
use crate::core::transition::{ModalChoice, TransitionPhase};

/// Colour hint for the modal footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterTone {
    Info,
    Error,
}

/// The open transition menu.
#[derive(Debug)]
pub struct TransitionModal {
    pub flow: FlowId,
    /// Selection when the menu was opened.
    pub row: usize,
    pub col: usize,
    pub key: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub focus: usize,
    pub footer: String,
    pub footer_tone: FooterTone,
    pub phase: TransitionPhase,
    choices: UnboundedSender<ModalChoice>,
}

impl TransitionModal {
    fn new(flow: FlowId, row: usize, col: usize, choices: UnboundedSender<ModalChoice>) -> Self {
        Self {
            flow,
            row,
            col,
            key: String::new(),
            prompt: String::new(),
            options: Vec::new(),
            focus: 0,
            footer: narration::MODAL_INSTRUCTIONS.to_string(),
            footer_tone: FooterTone::Info,
            phase: TransitionPhase::OptionsShown,
            choices,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.phase == TransitionPhase::AwaitingChoice
    }

    pub fn focus_next(&mut self) {
        if self.is_interactive() && !self.options.is_empty() {
            self.focus = (self.focus + 1) % self.options.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if self.is_interactive() && !self.options.is_empty() {
            self.focus = (self.focus + self.options.len() - 1) % self.options.len();
        }
    }

    pub fn focused(&self) -> Option<&str> {
        self.options.get(self.focus).map(String::as_str)
    }
}

pub struct App {
    pub data: TableData,
    pub selection: SelectionTracker,
    pub pages: PageStack,
    pub footer_text: String,
    pub help_text: String,
    pub transition: Option<TransitionModal>,
    /// The detail view behind the "please wait" overlay, if one is loading.
    pub detail: Option<FlowId>,
    pub announcer: Announcer,
    pub paint_count: u64,
    next_flow: u64,
}

impl App {
    pub fn new(data: TableData, announcer: Announcer) -> Self {
        let selection = SelectionTracker::new(&data, announcer.clone());
        Self {
            data,
            selection,
            pages: PageStack::default(),
            footer_text: String::new(),
            help_text: String::new(),
            transition: None,
            detail: None,
            announcer,
            paint_count: 0,
            next_flow: 0,
        }
    }

    pub fn accessibility(&self) -> bool {
        self.announcer.is_enabled()
    }

    pub fn announce(&self, text: impl Into<String>) {
        self.announcer.announce(text);
    }

    /// Full re-render from the (possibly mutated) store.
    pub fn repaint(&mut self) {
        self.selection.clamp_to(&self.data);
        self.paint_count += 1;
    }

    /// Key of the selected record (first column), or `""`.
    pub fn selected_key(&self) -> &str {
        self.data.get(self.selection.row(), Some(0))
    }

    /// Opens the transition overlay for `(row, col)` and returns the new
    /// flow's id with the receiving end of its choice channel.
    pub fn begin_transition(
        &mut self,
        row: usize,
        col: usize,
    ) -> (FlowId, UnboundedReceiver<ModalChoice>) {
        let flow = self.next_flow_id();
        let (tx, rx) = unbounded_channel();

        self.transition = Some(TransitionModal::new(flow, row, col, tx));
        self.pages.send_to_front(Page::Secondary);
        self.announce(narration::MODAL_INSTRUCTIONS);
        debug!("Transition {:?} opened at ({}, {})", flow, row, col);
        (flow, rx)
    }

    /// Submits the focused option. Returns the chosen label.
    pub fn choose_transition(&mut self) -> Option<String> {
        let modal = self.transition.as_mut()?;
        if !modal.is_interactive() {
            return None;
        }
        let label = modal.focused()?.to_string();
        modal.phase = TransitionPhase::Processing;
        modal.footer = narration::PROCESSING.to_string();
        modal.footer_tone = FooterTone::Info;
        if modal
            .choices
            .send(ModalChoice::Chosen(label.clone()))
            .is_err()
        {
            debug!("Transition {:?} flow already gone", modal.flow);
        }
        self.announce(narration::PROCESSING);
        Some(label)
    }

    /// Closes the menu without running the handler.
    ///
    /// Refused while the handler is running. Returns whether the menu closed.
    pub fn cancel_transition(&mut self) -> bool {
        let Some(modal) = &self.transition else {
            return false;
        };
        if modal.phase == TransitionPhase::Processing {
            return false;
        }
        let _ = modal.choices.send(ModalChoice::Cancel);
        debug!("Transition {:?} cancelled", modal.flow);

        self.transition = None;
        self.pages.hide(Page::Action);
        self.pages.hide(Page::Secondary);
        self.announce(narration::TRANSITION_CANCELLED);
        true
    }

    /// Shows the "please wait" overlay for a new detail view and returns its
    /// flow id.
    pub fn begin_detail(&mut self) -> FlowId {
        let flow = self.next_flow_id();
        self.detail = Some(flow);
        self.pages.send_to_front(Page::Secondary);
        debug!("Detail view {:?} opened", flow);
        flow
    }

    /// Abandons the loading detail view. Its text, if it still arrives, is
    /// never paged. Returns whether a detail view was loading.
    pub fn cancel_detail(&mut self) -> bool {
        let Some(flow) = self.detail.take() else {
            return false;
        };
        debug!("Detail view {:?} cancelled", flow);
        self.pages.hide(Page::Secondary);
        self.announce(narration::DETAIL_CANCELLED);
        true
    }

    fn next_flow_id(&mut self) -> FlowId {
        self.next_flow += 1;
        FlowId(self.next_flow)
    }

    /// The open modal, if it belongs to `flow`.
    pub(crate) fn modal_for(&mut self, flow: FlowId) -> Option<&mut TransitionModal> {
        self.transition.as_mut().filter(|m| m.flow == flow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (App, std::sync::mpsc::Receiver<String>) {
        let data = TableData::from(vec![
            vec!["KEY", "STATUS", "SUMMARY"],
            vec!["X-1", "Open", "Fix bug"],
        ]);
        let (announcer, rx) = Announcer::channel();
        (App::new(data, announcer), rx)
    }

    #[test]
    fn test_begin_transition_shows_overlay_and_instructions() {
        let (mut app, heard) = app();
        let (flow, _rx) = app.begin_transition(1, 0);

        assert_eq!(app.pages.front(), Page::Secondary);
        let modal = app.transition.as_ref().unwrap();
        assert_eq!(modal.flow, flow);
        assert_eq!(modal.phase, TransitionPhase::OptionsShown);
        assert_eq!(heard.try_recv().unwrap(), narration::MODAL_INSTRUCTIONS);
    }

    #[test]
    fn test_choose_requires_options() {
        let (mut app, _heard) = app();
        let (_flow, _rx) = app.begin_transition(1, 0);
        // Options have not arrived yet
        assert_eq!(app.choose_transition(), None);
    }

    #[test]
    fn test_cancel_sends_cancel_and_hides() {
        let (mut app, _heard) = app();
        let (_flow, mut rx) = app.begin_transition(1, 0);

        assert!(app.cancel_transition());
        assert!(app.transition.is_none());
        assert_eq!(app.pages.front(), Page::Primary);
        assert_eq!(rx.try_recv().unwrap(), ModalChoice::Cancel);
    }

    #[test]
    fn test_cancel_refused_while_processing() {
        let (mut app, _heard) = app();
        let (_flow, _rx) = app.begin_transition(1, 0);
        app.transition.as_mut().unwrap().phase = TransitionPhase::Processing;
        assert!(!app.cancel_transition());
        assert!(app.transition.is_some());
    }

    #[test]
    fn test_focus_wraps() {
        let (mut app, _heard) = app();
        let (_flow, _rx) = app.begin_transition(1, 0);
        let modal = app.transition.as_mut().unwrap();
        modal.options = vec!["Open".into(), "Done".into()];
        modal.phase = TransitionPhase::AwaitingChoice;

        modal.focus_prev();
        assert_eq!(modal.focused(), Some("Done"));
        modal.focus_next();
        assert_eq!(modal.focused(), Some("Open"));
    }

    #[test]
    fn test_flow_ids_are_unique_across_kinds() {
        let (mut app, _heard) = app();
        let detail = app.begin_detail();
        let (transition, _rx) = app.begin_transition(1, 0);
        assert_ne!(detail, transition);
    }

    #[test]
    fn test_cancel_detail_without_one_is_noop() {
        let (mut app, heard) = app();
        assert!(!app.cancel_detail());
        assert!(heard.try_recv().is_err());
    }

    #[test]
    fn test_selected_key_without_selection() {
        let (announcer, _rx) = Announcer::channel();
        let app = App::new(TableData::from(vec![vec!["KEY"]]), announcer);
        assert_eq!(app.selected_key(), "");
    }
}
