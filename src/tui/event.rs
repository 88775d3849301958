use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Keys the table understands, decoded from raw terminal input.
///
/// What a key *does* depends on the frontmost page; see `dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    // Table actions
    Quit,      // q
    ForceQuit, // Ctrl+C, from any page
    Refresh,   // Ctrl+R or F5
    Copy,      // c
    CopyKey,   // Ctrl+K
    Help,      // ?
    View,      // v
    Move,      // m
    SpeakCell, // Ctrl+S
    SpeakHelp, // Ctrl+A

    // Navigation
    Escape,
    Submit,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Tab,
    BackTab,

    Resize,
}

/// Poll for an event with timeout.
pub fn poll_event_timeout(timeout: Duration) -> std::io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(match event::read()? {
        Event::Key(key_event) => map_key(key_event),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    })
}

/// Translate a key press. Key releases are dropped.
pub fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(TuiEvent::Refresh),
        (KeyModifiers::CONTROL, KeyCode::Char('k')) => Some(TuiEvent::CopyKey),
        (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(TuiEvent::SpeakCell),
        (KeyModifiers::CONTROL, KeyCode::Char('a')) => Some(TuiEvent::SpeakHelp),
        (KeyModifiers::CONTROL, _) => None,
        (_, KeyCode::F(5)) => Some(TuiEvent::Refresh),
        (_, KeyCode::Char('q')) => Some(TuiEvent::Quit),
        (_, KeyCode::Char('c')) => Some(TuiEvent::Copy),
        (_, KeyCode::Char('?')) => Some(TuiEvent::Help),
        (_, KeyCode::Char('v')) => Some(TuiEvent::View),
        (_, KeyCode::Char('m')) => Some(TuiEvent::Move),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => Some(TuiEvent::Up),
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => Some(TuiEvent::Down),
        (_, KeyCode::Char('h')) | (_, KeyCode::Left) => Some(TuiEvent::Left),
        (_, KeyCode::Char('l')) | (_, KeyCode::Right) => Some(TuiEvent::Right),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => Some(TuiEvent::Home),
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => Some(TuiEvent::End),
        (_, KeyCode::PageUp) => Some(TuiEvent::PageUp),
        (_, KeyCode::PageDown) => Some(TuiEvent::PageDown),
        (_, KeyCode::Enter) => Some(TuiEvent::Submit),
        (_, KeyCode::Esc) => Some(TuiEvent::Escape),
        (_, KeyCode::Tab) => Some(TuiEvent::Tab),
        (_, KeyCode::BackTab) => Some(TuiEvent::BackTab),
        _ => None,
    }
}
