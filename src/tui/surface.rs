//! # Terminal Surface
//!
//! What the event loop needs from a terminal: draw a frame, read a key,
//! hand the terminal to another program for a while, and let go of it.
//! The loop is written against [`Surface`] so it can run over a real
//! terminal or over `ratatui::backend::TestBackend` in tests.

use log::{info, warn};
use std::io::{self, stdout};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::event::{TuiEvent, poll_event_timeout};
use crate::tui::ui;

pub trait Surface {
    /// Draws one frame. Only cells that changed since the last frame are written.
    fn draw(&mut self, app: &mut App, tui: &mut TuiState) -> io::Result<()>;

    /// Clears the screen and draws every cell.
    fn force_draw(&mut self, app: &mut App, tui: &mut TuiState) -> io::Result<()>;

    /// Waits up to `timeout` for a key.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TuiEvent>>;

    /// Releases the terminal, runs `run`, then takes the terminal back.
    fn suspend(&mut self, run: &mut dyn FnMut() -> io::Result<()>) -> io::Result<()>;

    /// Restores the terminal for good.
    fn stop(&mut self) -> io::Result<()>;
}

/// Hides the cursor for the lifetime of the surface.
struct CursorGuard;

impl CursorGuard {
    fn new() -> io::Result<Self> {
        execute!(stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// The real terminal: raw mode on the alternate screen.
pub struct CrosstermSurface {
    terminal: Option<DefaultTerminal>,
    _cursor: Option<CursorGuard>,
}

impl CrosstermSurface {
    pub fn start() -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        let cursor = CursorGuard::new()?;
        info!("Terminal surface started");
        Ok(Self {
            terminal: Some(terminal),
            _cursor: Some(cursor),
        })
    }

    fn terminal(&mut self) -> io::Result<&mut DefaultTerminal> {
        self.terminal
            .as_mut()
            .ok_or_else(|| io::Error::other("terminal surface already stopped"))
    }
}

impl Surface for CrosstermSurface {
    fn draw(&mut self, app: &mut App, tui: &mut TuiState) -> io::Result<()> {
        self.terminal()?.draw(|f| ui::draw_ui(f, app, tui))?;
        Ok(())
    }

    fn force_draw(&mut self, app: &mut App, tui: &mut TuiState) -> io::Result<()> {
        let terminal = self.terminal()?;
        terminal.clear()?;
        terminal.draw(|f| ui::draw_ui(f, app, tui))?;
        Ok(())
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TuiEvent>> {
        poll_event_timeout(timeout)
    }

    fn suspend(&mut self, run: &mut dyn FnMut() -> io::Result<()>) -> io::Result<()> {
        self._cursor = None;
        self.terminal = None;
        ratatui::try_restore()?;
        info!("Terminal surface suspended");

        let result = run();

        self.terminal = Some(ratatui::try_init()?);
        self._cursor = Some(CursorGuard::new()?);
        self.terminal()?.clear()?;
        info!("Terminal surface resumed");
        result
    }

    fn stop(&mut self) -> io::Result<()> {
        if self.terminal.take().is_none() {
            return Ok(());
        }
        self._cursor = None;
        ratatui::try_restore()?;
        info!("Terminal surface stopped");
        Ok(())
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
