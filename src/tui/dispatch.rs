//! # Key Dispatcher
//!
//! Routes one key at a time to the frontmost page, on the render thread.
//! Each key does one thing and returns. Anything slow (detail rendering, the
//! transition handler) comes back as a [`Dispatch`] the event loop turns into
//! a background task; quit and refresh come back as a [`Dispatch`] too, so
//! the loop can restore the terminal before anything else happens.
//!
//! | Front page  | Handled keys |
//! |-------------|--------------|
//! | `help`      | Esc / q close it |
//! | `action`    | the action modal's keys |
//! | `secondary` | Esc / q cancel the flow still loading, rest swallowed |
//! | `primary`   | the table key map |
//!
//! Ctrl+C quits from every page.

use log::debug;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::action::FlowId;
use crate::core::hooks::{CellFunc, TableHooks};
use crate::core::narration;
use crate::core::page::Page;
use crate::core::state::App;
use crate::core::transition::ModalChoice;
use crate::tui::component::EventHandler;
use crate::tui::components::{ActionModal, ModalEvent};
use crate::tui::event::TuiEvent;

/// What the event loop has to do after a key.
#[derive(Debug)]
pub enum Dispatch {
    None,
    Quit,
    Refresh,
    /// Render the detail view for `(row, col)` in the background.
    SpawnDetail { flow: FlowId, row: usize, col: usize },
    /// Run the transition flow in the background.
    SpawnTransition {
        flow: FlowId,
        row: usize,
        col: usize,
        choices: UnboundedReceiver<ModalChoice>,
    },
}

/// Handles one key. `page_rows` is how many rows PageUp/PageDown move.
pub fn dispatch(app: &mut App, hooks: &TableHooks, event: TuiEvent, page_rows: usize) -> Dispatch {
    debug!("Dispatch {:?} on page {}", event, app.pages.front().name());

    if event == TuiEvent::ForceQuit {
        return Dispatch::Quit;
    }

    match app.pages.front() {
        Page::Help => {
            if matches!(event, TuiEvent::Escape | TuiEvent::Quit) {
                app.pages.hide(Page::Help);
            }
            Dispatch::None
        }
        Page::Action => {
            let Some(modal) = app.transition.as_mut() else {
                // Nothing to drive; don't leave the page stuck in front
                app.pages.hide(Page::Action);
                return Dispatch::None;
            };
            let modal_event = ActionModal::new(modal).handle_event(&event);
            match modal_event {
                Some(ModalEvent::Choose(label)) => {
                    debug!("Transition option chosen: {}", label);
                    app.choose_transition();
                }
                Some(ModalEvent::Cancel) => {
                    app.cancel_transition();
                }
                None => {}
            }
            Dispatch::None
        }
        Page::Secondary => {
            if matches!(event, TuiEvent::Escape | TuiEvent::Quit) && !app.cancel_transition() {
                app.cancel_detail();
            }
            Dispatch::None
        }
        Page::Primary => dispatch_primary(app, hooks, event, page_rows),
    }
}

fn dispatch_primary(app: &mut App, hooks: &TableHooks, event: TuiEvent, page_rows: usize) -> Dispatch {
    let page_rows = page_rows.max(1) as isize;
    match event {
        TuiEvent::Quit | TuiEvent::Escape => Dispatch::Quit,
        TuiEvent::Refresh if hooks.refresh.is_some() => Dispatch::Refresh,
        TuiEvent::Copy => {
            if call_cell_hook(app, hooks.copy.as_ref()) {
                app.announce(narration::COPIED);
            }
            Dispatch::None
        }
        TuiEvent::CopyKey => {
            call_cell_hook(app, hooks.copy_key.as_ref());
            Dispatch::None
        }
        TuiEvent::Submit => {
            call_cell_hook(app, hooks.selected.as_ref());
            Dispatch::None
        }
        TuiEvent::Help => {
            app.pages.show(Page::Help);
            app.announce(narration::HELP_OPENED);
            Dispatch::None
        }
        TuiEvent::View if hooks.detail.is_some() => {
            let (Some(row), Some(col)) = app.selection.current() else {
                return Dispatch::None;
            };
            app.announce(narration::viewing_details(app.selected_key()));
            let flow = app.begin_detail();
            Dispatch::SpawnDetail { flow, row, col }
        }
        TuiEvent::Move if hooks.transition.is_some() => {
            let (Some(row), Some(col)) = app.selection.current() else {
                return Dispatch::None;
            };
            let (flow, choices) = app.begin_transition(row, col);
            Dispatch::SpawnTransition {
                flow,
                row,
                col,
                choices,
            }
        }
        TuiEvent::SpeakCell if app.accessibility() => {
            if let (Some(row), Some(col)) = app.selection.current()
                && let Some(text) = narration::cell(&app.data, row, col)
            {
                app.announce(text);
            }
            Dispatch::None
        }
        TuiEvent::SpeakHelp if app.accessibility() => {
            app.announce(narration::ACCESSIBILITY_HELP);
            Dispatch::None
        }
        TuiEvent::Up => move_rows(app, -1),
        TuiEvent::Down => move_rows(app, 1),
        TuiEvent::PageUp => move_rows(app, -page_rows),
        TuiEvent::PageDown => move_rows(app, page_rows),
        TuiEvent::Left => move_cols(app, -1),
        TuiEvent::Right => move_cols(app, 1),
        TuiEvent::Home => {
            app.selection.first(&app.data);
            Dispatch::None
        }
        TuiEvent::End => {
            app.selection.last(&app.data);
            Dispatch::None
        }
        _ => Dispatch::None,
    }
}

fn move_rows(app: &mut App, by: isize) -> Dispatch {
    app.selection.move_by(&app.data, by, 0);
    Dispatch::None
}

fn move_cols(app: &mut App, by: isize) -> Dispatch {
    app.selection.move_by(&app.data, 0, by);
    Dispatch::None
}

/// Calls `hook` with the current selection. Returns whether it ran.
fn call_cell_hook(app: &App, hook: Option<&CellFunc>) -> bool {
    let (Some(hook), (Some(row), Some(col))) = (hook, app.selection.current()) else {
        return false;
    };
    hook(row, col, &app.data);
    true
}
