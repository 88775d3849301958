use ratatui::Frame;
use ratatui::layout::Rect;

/// A drawable page or overlay.
///
/// Overlays receive what they show as props (struct fields) borrowed from
/// `App` for the duration of one frame, and draw themselves into the area
/// the page stack gives them.
pub trait Component {
    /// Render the component into the given area.
    ///
    /// Takes `&mut self` so a component can keep presentation state
    /// (scroll offsets, cached widths) between frames.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A page that interprets keys while it is frontmost.
pub trait EventHandler {
    /// The high-level event this page emits.
    type Event;

    /// Handle a `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
