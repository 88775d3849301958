use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_box;
use crate::tui::component::Component;

/// The "please wait" box on the secondary page.
pub struct WaitOverlay;

impl Component for WaitOverlay {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_box(40, 3, area);
        frame.render_widget(Clear, overlay);
        let wait = Paragraph::new("Fetching data... Please wait.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(wait, overlay);
    }
}
