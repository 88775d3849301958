//! # TUI Components
//!
//! The overlays drawn on top of the table, one per page.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `HelpOverlay`: key binding summary (the `help` page)
//! - `WaitOverlay`: "please wait" box while a background task loads (the `secondary` page)
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `ActionModal`: the transition menu (the `action` page). Its state lives
//!   in `core::state::TransitionModal` so background flows can update it
//!   through actions; the component is a transient wrapper borrowing that
//!   state for one frame or one key.
//!
//! ## Props-Based Data Flow
//!
//! Components receive what they show as props, never by reaching into `App`:
//!
//! ```rust,ignore
//! HelpOverlay::new(&app.help_text).render(frame, area);
//! ```

pub mod action_modal;
pub mod help;
pub mod wait;

pub use action_modal::{ActionModal, ModalEvent};
pub use help::HelpOverlay;
pub use wait::WaitOverlay;

use ratatui::layout::{Constraint, Layout, Rect};

/// Compute a centered rect using percentage of the outer rect.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

/// Center a box of fixed size inside `outer`, shrinking it to fit.
pub(crate) fn centered_box(width: u16, height: u16, outer: Rect) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}
