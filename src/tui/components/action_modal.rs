//! # Action Modal
//!
//! The transition menu: a prompt, one button per candidate state, and a
//! footer line that reports instructions, progress, or the handler's error.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `TransitionModal` lives in `App` (core), where flow actions update it
//! - `ActionModal` is created per frame or per key with borrowed state

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use super::centered_rect;
use crate::core::state::{FooterTone, TransitionModal};
use crate::core::transition::TransitionPhase;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Events emitted by the action modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    Choose(String),
    Cancel,
}

pub struct ActionModal<'a> {
    modal: &'a mut TransitionModal,
}

impl<'a> ActionModal<'a> {
    pub fn new(modal: &'a mut TransitionModal) -> Self {
        Self { modal }
    }
}

impl EventHandler for ActionModal<'_> {
    type Event = ModalEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<ModalEvent> {
        // The handler call can't be interrupted
        if self.modal.phase == TransitionPhase::Processing {
            return None;
        }
        match event {
            TuiEvent::Escape | TuiEvent::Quit => Some(ModalEvent::Cancel),
            TuiEvent::Tab | TuiEvent::Right => {
                self.modal.focus_next();
                None
            }
            TuiEvent::BackTab | TuiEvent::Left => {
                self.modal.focus_prev();
                None
            }
            TuiEvent::Submit if self.modal.is_interactive() => self
                .modal
                .focused()
                .map(|label| ModalEvent::Choose(label.to_string())),
            _ => None,
        }
    }
}

impl Component for ActionModal<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 40, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.modal.key))
            .title_alignment(Alignment::Left)
            .padding(Padding::new(1, 1, 1, 0));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [prompt_area, buttons_area, _, footer_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(self.modal.prompt.as_str()).alignment(Alignment::Center),
            prompt_area,
        );

        let mut spans = Vec::with_capacity(self.modal.options.len() * 2);
        for (i, option) in self.modal.options.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            let style = if i == self.modal.focus {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {option} "), style));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            buttons_area,
        );

        let footer_color = match self.modal.footer_tone {
            FooterTone::Info => Color::Gray,
            FooterTone::Error => Color::Red,
        };
        frame.render_widget(
            Paragraph::new(self.modal.footer.as_str())
                .style(Style::default().fg(footer_color))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            footer_area,
        );
    }
}
