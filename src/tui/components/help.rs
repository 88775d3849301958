//! # Help Overlay
//!
//! Key binding summary shown by `?`, dismissed with Esc or `q`.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use super::centered_rect;
use crate::tui::component::Component;

pub const DEFAULT_HELP_TEXT: &str = "\
↑ ↓ j k       Move between rows
← → h l       Scroll columns
g G           First / last row
Enter         Select
v             View details
m             Transition
c             Copy row
Ctrl+K        Copy key
Ctrl+R F5     Refresh
?             This help
q Esc         Quit";

pub struct HelpOverlay<'a> {
    pub text: &'a str,
}

impl<'a> HelpOverlay<'a> {
    /// Empty text falls back to [`DEFAULT_HELP_TEXT`].
    pub fn new(text: &'a str) -> Self {
        let text = if text.trim().is_empty() {
            DEFAULT_HELP_TEXT
        } else {
            text
        };
        Self { text }
    }
}

impl Component for HelpOverlay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(60, 60, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" USAGE ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Esc/q Close ").centered())
            .padding(Padding::horizontal(1));

        let help = Paragraph::new(self.text)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(help, overlay);
    }
}
