//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, draws the table, and turns
//! key presses into calls on core state.
//!
//! ## Threads
//!
//! The event loop runs on the caller's thread and is the only code that
//! touches `App`. Slow work (the detail view, the transition flow, the
//! delayed first announcement) runs as tokio tasks that post `Action`s
//! back over a channel; the loop drains it every tick:
//!
//! ```text
//! key ──► dispatch ──► App            task ──Action──► rx ──► update ──► App
//!            │                                                   │
//!            └── Spawn* ──► tokio task                           └── Effect
//! ```
//!
//! Every task is supervised: if one panics, the loop stops and `paint`
//! returns `TableError::Fatal` instead of leaving the UI hanging.

mod component;
mod components;
pub mod dispatch;
pub mod event;
#[cfg(test)]
mod flow_tests;
mod pager;
pub mod surface;
mod ui;

use log::{debug, error, info, warn};
use std::fs::OpenOptions;
use std::future::Future;
use std::io;
use std::sync::mpsc;
use std::time::Duration;

use ratatui::style::Style;
use ratatui::widgets::TableState;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::core::action::{Action, Effect, update};
use crate::core::announce::Announcer;
use crate::core::config::{AnnouncementOutput, ResolvedConfig};
use crate::core::detail::run_detail;
use crate::core::error::TableError;
use crate::core::hooks::TableHooks;
use crate::core::state::App;
use crate::core::table::TableData;
use crate::core::transition::run_flow;
use crate::tui::dispatch::{Dispatch, dispatch};
use crate::tui::event::TuiEvent;

pub use components::help::DEFAULT_HELP_TEXT;
pub use surface::{CrosstermSurface, Surface};
pub use ui::draw_ui;

/// How long the loop waits for a key before draining background actions.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TUI-specific presentation state (not part of core logic)
pub struct TuiState {
    pub table_state: TableState,
    /// Scrollable columns hidden on the left.
    pub col_offset: usize,
    /// Data rows visible at once, set on every draw.
    pub page_rows: usize,
    pub column_padding: u16,
    pub max_column_width: u16,
    pub fixed_columns: usize,
    pub selection_style: Style,
    pub pager: String,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            table_state: TableState::default(),
            col_offset: 0,
            page_rows: 1,
            column_padding: config.column_padding,
            max_column_width: config.max_column_width,
            fixed_columns: config.fixed_columns,
            selection_style: ui::selection_style(&config.selection_style),
            pager: config.pager.clone(),
        }
    }
}

/// Why `paint` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// The user asked for fresh data. The refresh hook has already run.
    Refresh,
}

/// The interactive table.
///
/// ```rust,ignore
/// let mut table = Table::new(config)
///     .with_footer("Showing 42 issues")
///     .with_hooks(TableHooks::default().with_copy(copy_row));
/// match table.paint(data)? {
///     Exit::Quit => {}
///     Exit::Refresh => { /* fetch and paint again */ }
/// }
/// ```
pub struct Table {
    config: ResolvedConfig,
    footer_text: String,
    help_text: String,
    hooks: TableHooks,
    announcer: Option<Announcer>,
}

impl Table {
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            footer_text: String::new(),
            help_text: DEFAULT_HELP_TEXT.to_string(),
            hooks: TableHooks::default(),
            announcer: None,
        }
    }

    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer_text = text.into();
        self
    }

    pub fn with_help(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    pub fn with_hooks(mut self, hooks: TableHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Uses `announcer` instead of building one from the config.
    pub fn with_announcer(mut self, announcer: Announcer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Shows `data` on the real terminal until the user quits or refreshes.
    ///
    /// Must be called from inside a multi-threaded tokio runtime. Invalid
    /// data is rejected before the terminal is touched.
    pub fn paint(&mut self, data: TableData) -> Result<Exit, TableError> {
        data.validate()?;
        let mut surface = CrosstermSurface::start()?;
        self.paint_on(&mut surface, data)
    }

    /// Like [`Table::paint`], on any surface.
    pub fn paint_on<S: Surface>(&mut self, surface: &mut S, data: TableData) -> Result<Exit, TableError> {
        data.validate()?;
        let runtime = Handle::try_current()
            .map_err(|_| TableError::Fatal("paint must run inside a tokio runtime".to_string()))?;
        // The loop blocks its thread; background flows need another worker
        if runtime.runtime_flavor() == RuntimeFlavor::CurrentThread {
            return Err(TableError::Fatal(
                "paint needs a multi-threaded tokio runtime".to_string(),
            ));
        }
        let announcer = self.announcer()?;

        info!(
            "Painting {} rows x {} columns (accessibility: {})",
            data.data_row_count(),
            data.column_count(),
            announcer.is_enabled()
        );

        let mut app = App::new(data, announcer);
        app.footer_text = self.footer_text.clone();
        app.help_text = self.help_text.clone();
        let mut tui = TuiState::new(&self.config);
        let (tx, rx) = mpsc::channel();

        if app.accessibility() && app.data.data_row_count() > 0 {
            let delay = Duration::from_millis(self.config.initial_announcement_delay_ms);
            spawn_supervised(
                &runtime,
                "initial announcement",
                tx.clone(),
                initial_announcement(app.footer_text.clone(), delay, tx.clone()),
            );
        }

        let result = run_loop(surface, &mut app, &self.hooks, &mut tui, &runtime, &tx, &rx);
        if let Err(e) = surface.stop() {
            warn!("Failed to stop terminal surface: {}", e);
        }
        let exit = result?;
        info!("Table closed: {:?}", exit);

        if exit == Exit::Refresh
            && let Some(refresh) = &self.hooks.refresh
        {
            refresh();
        }
        Ok(exit)
    }

    fn announcer(&mut self) -> io::Result<Announcer> {
        if let Some(announcer) = &self.announcer {
            return Ok(announcer.clone());
        }
        let announcer = build_announcer(&self.config)?;
        self.announcer = Some(announcer.clone());
        Ok(announcer)
    }
}

/// The announcer the config asks for. Disabled unless accessibility is on.
pub fn build_announcer(config: &ResolvedConfig) -> io::Result<Announcer> {
    if !config.accessibility {
        return Ok(Announcer::disabled());
    }
    let format = config.announcement_format;
    // The writer thread is detached; it exits when the last announcer drops
    let announcer = match &config.announcement_output {
        AnnouncementOutput::Stderr => Announcer::spawn_writer(io::stderr(), format).0,
        AnnouncementOutput::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            info!("Writing announcements to {}", path.display());
            Announcer::spawn_writer(file, format).0
        }
    };
    Ok(announcer)
}

/// Announces the footer and then the first row, once the table has had time
/// to settle on its initial selection.
async fn initial_announcement(footer: String, delay: Duration, tx: mpsc::Sender<Action>) {
    tokio::time::sleep(delay).await;
    if !footer.trim().is_empty() && tx.send(Action::Announce(footer)).is_err() {
        return;
    }
    if tx.send(Action::NarrateSelection).is_err() {
        debug!("Table closed before the initial announcement");
    }
}

fn run_loop<S: Surface>(
    surface: &mut S,
    app: &mut App,
    hooks: &TableHooks,
    tui: &mut TuiState,
    runtime: &Handle,
    tx: &mpsc::Sender<Action>,
    rx: &mpsc::Receiver<Action>,
) -> Result<Exit, TableError> {
    let mut needs_redraw = true; // Force first frame
    let mut painted = app.paint_count;
    let mut force_redraw = false;

    loop {
        if force_redraw || app.paint_count != painted {
            surface.force_draw(app, tui)?;
            painted = app.paint_count;
            force_redraw = false;
            needs_redraw = false;
        } else if needs_redraw {
            surface.draw(app, tui)?;
            needs_redraw = false;
        }

        if let Some(event) = surface.poll_event(POLL_INTERVAL)? {
            needs_redraw = true;
            if event != TuiEvent::Resize {
                match dispatch(app, hooks, event, tui.page_rows) {
                    Dispatch::None => {}
                    Dispatch::Quit => return Ok(Exit::Quit),
                    Dispatch::Refresh => return Ok(Exit::Refresh),
                    Dispatch::SpawnDetail { flow, row, col } => {
                        if let Some(source) = hooks.detail.clone() {
                            info!("Spawning detail view {:?} for row {}", flow, row);
                            spawn_supervised(
                                runtime,
                                "detail view",
                                tx.clone(),
                                run_detail(flow, source, row, col, app.data.clone(), tx.clone()),
                            );
                        }
                    }
                    Dispatch::SpawnTransition {
                        flow,
                        row,
                        col,
                        choices,
                    } => {
                        if let Some(source) = hooks.transition.clone() {
                            info!("Spawning transition {:?} for row {}", flow, row);
                            spawn_supervised(
                                runtime,
                                "transition",
                                tx.clone(),
                                run_flow(flow, source, row, col, choices, tx.clone()),
                            );
                        }
                    }
                }
            }
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            match update(app, action) {
                Effect::None => {}
                Effect::PageOut(text) => {
                    let command = tui.pager.clone();
                    if let Err(e) = surface.suspend(&mut || pager::page_out(&command, &text)) {
                        warn!("Pager failed: {}", e);
                    }
                    force_redraw = true;
                }
                Effect::Fatal(message) => {
                    error!("Stopping table: {}", message);
                    return Err(TableError::Fatal(message));
                }
            }
        }
    }
}

/// Spawns `task` and reports a panic in it as `Action::Fatal`.
fn spawn_supervised<F>(runtime: &Handle, name: &'static str, tx: mpsc::Sender<Action>, task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = runtime.spawn(task);
    runtime.spawn(async move {
        let Err(e) = handle.await else {
            return;
        };
        if !e.is_panic() {
            return;
        }
        let payload = e.into_panic();
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!("{} task panicked: {}", name, reason);
        if tx
            .send(Action::Fatal(format!("{name} task panicked: {reason}")))
            .is_err()
        {
            warn!("Failed to report {} panic: receiver dropped", name);
        }
    });
}
