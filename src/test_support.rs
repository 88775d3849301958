//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::core::page::Page;
use crate::core::state::App;
use crate::core::table::TableData;
use crate::tui::event::TuiEvent;
use crate::tui::{Surface, TuiState, draw_ui};

/// How long a `WaitFor*` step waits before failing the test.
const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Three issues with the columns the narration looks for.
pub fn sample_data() -> TableData {
    TableData::from(vec![
        vec!["KEY", "STATUS", "SUMMARY", "ASSIGNEE"],
        vec!["X-1", "Open", "Fix login bug", "ana"],
        vec!["X-2", "In Progress", "Write docs", "ben"],
        vec!["X-3", "Done", "Ship it", "cho"],
    ])
}

/// One step of a scripted session.
#[derive(Debug)]
pub enum Step {
    Key(TuiEvent),
    /// Block input until the last frame contains the text.
    WaitFor(&'static str),
    /// Block input until the given page was in front on the last frame.
    WaitForFront(Page),
    /// Block input until the surface has been suspended this many times.
    WaitForSuspend(usize),
    Sleep(Duration),
}

/// A [`Surface`] over `TestBackend` that replays a script of keys.
///
/// Once the script runs out it sends Ctrl+C so a test can never hang.
pub struct ScriptedSurface {
    pub terminal: Terminal<TestBackend>,
    steps: VecDeque<Step>,
    waiting_since: Option<Instant>,
    pub draws: usize,
    pub force_draws: usize,
    pub suspends: usize,
    pub stopped: bool,
    pub last_front: Option<Page>,
}

impl ScriptedSurface {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            terminal: Terminal::new(TestBackend::new(100, 30)).expect("test terminal"),
            steps: steps.into(),
            waiting_since: None,
            draws: 0,
            force_draws: 0,
            suspends: 0,
            stopped: false,
            last_front: None,
        }
    }

    pub fn screen(&self) -> String {
        self.terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    /// One row of the last frame.
    pub fn line(&self, y: u16) -> String {
        let buffer = self.terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    fn step_done(&self, step: &Step) -> bool {
        match step {
            Step::WaitFor(text) => self.screen().contains(text),
            Step::WaitForFront(page) => self.last_front == Some(*page),
            Step::WaitForSuspend(count) => self.suspends >= *count,
            Step::Key(_) | Step::Sleep(_) => true,
        }
    }
}

impl Surface for ScriptedSurface {
    fn draw(&mut self, app: &mut App, tui: &mut TuiState) -> io::Result<()> {
        self.terminal
            .draw(|f| draw_ui(f, app, tui))
            .map_err(|e| io::Error::other(e.to_string()))?;
        self.last_front = Some(app.pages.front());
        self.draws += 1;
        Ok(())
    }

    fn force_draw(&mut self, app: &mut App, tui: &mut TuiState) -> io::Result<()> {
        self.terminal
            .clear()
            .map_err(|e| io::Error::other(e.to_string()))?;
        self.force_draws += 1;
        self.draw(app, tui)
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<TuiEvent>> {
        let Some(step) = self.steps.front() else {
            return Ok(Some(TuiEvent::ForceQuit));
        };
        match step {
            Step::Key(event) => {
                let event = *event;
                self.steps.pop_front();
                Ok(Some(event))
            }
            Step::Sleep(duration) => {
                std::thread::sleep(*duration);
                self.steps.pop_front();
                Ok(None)
            }
            _ if self.step_done(step) => {
                self.waiting_since = None;
                self.steps.pop_front();
                Ok(None)
            }
            _ => {
                let since = *self.waiting_since.get_or_insert_with(Instant::now);
                assert!(
                    since.elapsed() < STEP_TIMEOUT,
                    "timed out on {:?}; screen:\n{}",
                    step,
                    self.screen()
                );
                std::thread::sleep(timeout.min(Duration::from_millis(10)));
                Ok(None)
            }
        }
    }

    fn suspend(&mut self, _run: &mut dyn FnMut() -> io::Result<()>) -> io::Result<()> {
        // The pager would take over the real terminal
        self.suspends += 1;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.stopped = true;
        Ok(())
    }
}
