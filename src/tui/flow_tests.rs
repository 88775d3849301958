//! End-to-end tests: the real event loop, background flows, and announcer,
//! driven by a scripted surface over `TestBackend`.

use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::announce::{AnnouncementFormat, Announcer};
use crate::core::config::ResolvedConfig;
use crate::core::detail::DetailSource;
use crate::core::error::{DetailError, HandlerError, TableError};
use crate::core::hooks::TableHooks;
use crate::core::narration;
use crate::core::page::Page;
use crate::core::table::TableData;
use crate::core::transition::{
    StateRefresh, TransitionHandler, TransitionRequest, TransitionSource,
};
use crate::test_support::{ScriptedSurface, Step};
use crate::tui::event::TuiEvent;
use crate::tui::{Exit, Table};

// ============================================================================
// Fixtures
// ============================================================================

fn issues() -> TableData {
    TableData::from(vec![
        vec!["KEY", "STATUS", "SUMMARY"],
        vec!["X-1", "Open", "Fix bug"],
        vec!["X-2", "Done", "Write docs"],
        vec!["X-3", "Open", "Ship it"],
    ])
}

fn config() -> ResolvedConfig {
    ResolvedConfig {
        accessibility: true,
        initial_announcement_delay_ms: 0,
        ..ResolvedConfig::default()
    }
}

fn ms(millis: u64) -> Step {
    Step::Sleep(Duration::from_millis(millis))
}

/// Accepts any state except the ones listed in `reject`.
struct ScriptedHandler {
    calls: Arc<Mutex<Vec<String>>>,
    reject: &'static [&'static str],
}

#[async_trait]
impl TransitionHandler for ScriptedHandler {
    async fn transition(&self, state: &str) -> Result<(), HandlerError> {
        self.calls.lock().unwrap().push(state.to_string());
        if self.reject.contains(&state) {
            return Err(HandlerError::new("not allowed"));
        }
        Ok(())
    }
}

struct Workflow {
    calls: Arc<Mutex<Vec<String>>>,
    refreshes: Arc<AtomicUsize>,
    reject: &'static [&'static str],
    delay: Duration,
}

impl Workflow {
    fn new(reject: &'static [&'static str]) -> Self {
        Self {
            calls: Arc::default(),
            refreshes: Arc::default(),
            reject,
            delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl TransitionSource for Workflow {
    async fn prepare(&self, row: usize, _col: usize) -> TransitionRequest {
        tokio::time::sleep(self.delay).await;
        let handler = Arc::new(ScriptedHandler {
            calls: self.calls.clone(),
            reject: self.reject,
        });
        let refreshes = self.refreshes.clone();
        TransitionRequest::new(format!("X-{row}"), ["Open", "In Progress", "Done"], handler)
            .with_current_state("Open")
            .with_refresh(StateRefresh::new(move |data, row, _col, state| {
                refreshes.fetch_add(1, Ordering::SeqCst);
                let status = data.get_index("status");
                data.update(Some(row), status, state);
            }))
    }
}

struct PanickingSource;

#[async_trait]
impl TransitionSource for PanickingSource {
    async fn prepare(&self, _row: usize, _col: usize) -> TransitionRequest {
        panic!("tracker unreachable");
    }
}

/// Takes `delay` to render, then counts the render.
struct SlowDetail {
    delay: Duration,
    rendered: Arc<AtomicUsize>,
}

#[async_trait]
impl DetailSource for SlowDetail {
    async fn render(&self, row: usize, _col: usize, data: TableData) -> Result<String, DetailError> {
        tokio::time::sleep(self.delay).await;
        self.rendered.fetch_add(1, Ordering::SeqCst);
        Ok(format!("# {}", data.get(Some(row), Some(0))))
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn heard(rx: &Receiver<String>) -> Vec<String> {
    rx.try_iter().collect()
}

const PROMPT: &str = "Select desired state to transition X-1 to:";

// ============================================================================
// Painting
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_ragged_rows_are_rejected() {
    let mut surface = ScriptedSurface::new(vec![]);
    let data = TableData::from(vec![vec!["KEY", "STATUS"], vec!["X-1"]]);
    let result = Table::new(config()).paint_on(&mut surface, data);
    assert!(matches!(
        result,
        Err(TableError::RaggedRow {
            row: 1,
            expected: 2,
            found: 1
        })
    ));
    assert_eq!(surface.draws, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_header_only_paints_without_narration() {
    let (announcer, rx) = Announcer::channel();
    let mut table = Table::new(config())
        .with_footer("Nothing to show")
        .with_announcer(announcer);
    let mut surface = ScriptedSurface::new(vec![
        ms(150),
        Step::Key(TuiEvent::Down),
        Step::Key(TuiEvent::SpeakCell),
        Step::Key(TuiEvent::Quit),
    ]);

    let data = TableData::from(vec![vec!["KEY", "STATUS", "SUMMARY"]]);
    assert_eq!(table.paint_on(&mut surface, data).unwrap(), Exit::Quit);
    assert!(surface.line(0).contains("SUMMARY"));
    assert!(heard(&rx).is_empty());
}

// ============================================================================
// Narration
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_initial_announcement_then_navigation() {
    let (announcer, rx) = Announcer::channel();
    let mut table = Table::new(config())
        .with_footer("Showing 3 issues")
        .with_announcer(announcer);
    let mut surface = ScriptedSurface::new(vec![
        ms(150),
        Step::Key(TuiEvent::Down),
        Step::Key(TuiEvent::Right),
        Step::Key(TuiEvent::SpeakCell),
        Step::Key(TuiEvent::End),
        Step::Key(TuiEvent::Quit),
    ]);

    table.paint_on(&mut surface, issues()).unwrap();
    assert_eq!(
        heard(&rx),
        vec![
            "Showing 3 issues",
            "1 of 3: X-1, Open, Fix bug",
            "2 of 3: X-2, Done, Write docs",
            "Row 2, Column 1 (STATUS): Done",
            "3 of 3: X-3, Open, Ship it",
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_keys_work_with_accessibility_off() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let quiet = ResolvedConfig::default();
    assert!(!quiet.accessibility);

    let mut table = Table::new(quiet).with_hooks(TableHooks::default().with_copy(move |_, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let mut surface = ScriptedSurface::new(vec![
        Step::Key(TuiEvent::Down),
        Step::Key(TuiEvent::Copy),
        Step::Key(TuiEvent::Help),
        Step::WaitFor("USAGE"),
        Step::Key(TuiEvent::Escape),
        Step::Key(TuiEvent::SpeakHelp),
        Step::Key(TuiEvent::Quit),
    ]);

    assert_eq!(table.paint_on(&mut surface, issues()).unwrap(), Exit::Quit);
    // Copy still works without narration
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_marker_lines_written_in_order() {
    let buf = SharedBuf::default();
    let (announcer, writer) = Announcer::spawn_writer(buf.clone(), AnnouncementFormat::Marker);
    let mut table = Table::new(config()).with_announcer(announcer);
    let mut surface = ScriptedSurface::new(vec![
        ms(150),
        Step::Key(TuiEvent::Down),
        Step::Key(TuiEvent::Help),
        Step::Key(TuiEvent::Quit),
        Step::Key(TuiEvent::Quit),
    ]);

    table.paint_on(&mut surface, issues()).unwrap();
    drop(table);
    writer.join().unwrap();

    let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    assert_eq!(
        output,
        format!(
            "[SCREEN_READER_ANNOUNCEMENT] 1 of 3: X-1, Open, Fix bug\n\
             [SCREEN_READER_ANNOUNCEMENT] 2 of 3: X-2, Done, Write docs\n\
             [SCREEN_READER_ANNOUNCEMENT] {}\n",
            narration::HELP_OPENED
        )
    );
}

// ============================================================================
// Detail view
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_cancelled_detail_view_is_never_paged() {
    let (announcer, rx) = Announcer::channel();
    let rendered = Arc::new(AtomicUsize::new(0));
    let detail = SlowDetail {
        delay: Duration::from_millis(200),
        rendered: rendered.clone(),
    };
    let mut table = Table::new(config())
        .with_announcer(announcer)
        .with_hooks(TableHooks::default().with_detail(Arc::new(detail)));
    let mut surface = ScriptedSurface::new(vec![
        ms(150),
        Step::Key(TuiEvent::View),
        Step::WaitForFront(Page::Secondary),
        Step::Key(TuiEvent::Escape),
        Step::WaitForFront(Page::Primary),
        ms(400),
        Step::Key(TuiEvent::Down),
        Step::Key(TuiEvent::Quit),
    ]);

    assert_eq!(table.paint_on(&mut surface, issues()).unwrap(), Exit::Quit);
    assert_eq!(rendered.load(Ordering::SeqCst), 1);
    assert_eq!(surface.suspends, 0);
    assert_eq!(surface.last_front, Some(Page::Primary));
    assert_eq!(
        heard(&rx),
        vec![
            "1 of 3: X-1, Open, Fix bug",
            "Viewing details for X-1",
            narration::DETAIL_CANCELLED,
            "2 of 3: X-2, Done, Write docs",
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_detail_view_after_cancel_still_pages() {
    let rendered = Arc::new(AtomicUsize::new(0));
    let detail = SlowDetail {
        delay: Duration::from_millis(100),
        rendered: rendered.clone(),
    };
    let mut table = Table::new(ResolvedConfig::default())
        .with_hooks(TableHooks::default().with_detail(Arc::new(detail)));
    let mut surface = ScriptedSurface::new(vec![
        Step::Key(TuiEvent::View),
        Step::Key(TuiEvent::Quit),
        Step::Key(TuiEvent::View),
        Step::WaitForSuspend(1),
        Step::WaitForFront(Page::Primary),
        ms(200),
        Step::Key(TuiEvent::Quit),
    ]);

    assert_eq!(table.paint_on(&mut surface, issues()).unwrap(), Exit::Quit);
    assert_eq!(rendered.load(Ordering::SeqCst), 2);
    // Only the second view reached the pager
    assert_eq!(surface.suspends, 1);
}

// ============================================================================
// Transition flow
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_transition_success_refreshes_and_repaints() {
    let (announcer, rx) = Announcer::channel();
    let workflow = Workflow::new(&[]);
    let (calls, refreshes) = (workflow.calls.clone(), workflow.refreshes.clone());
    let mut table = Table::new(config())
        .with_announcer(announcer)
        .with_hooks(TableHooks::default().with_transition(Arc::new(workflow)));
    let mut surface = ScriptedSurface::new(vec![
        ms(150),
        Step::Key(TuiEvent::Move),
        Step::WaitFor(PROMPT),
        Step::Key(TuiEvent::Tab),
        Step::Key(TuiEvent::Submit),
        Step::WaitForFront(Page::Primary),
        Step::Key(TuiEvent::Quit),
    ]);

    table.paint_on(&mut surface, issues()).unwrap();

    assert_eq!(*calls.lock().unwrap(), vec!["In Progress"]);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert!(surface.force_draws >= 1);
    let first_row = surface.line(1);
    assert!(first_row.contains("X-1") && first_row.contains("In Progress"));
    assert_eq!(
        heard(&rx),
        vec![
            "1 of 3: X-1, Open, Fix bug",
            narration::MODAL_INSTRUCTIONS,
            "Transition menu for X-1. Available options: Open, In Progress, Done",
            narration::PROCESSING,
            "Successfully transitioned X-1 to In Progress",
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_transition_failure_then_cancel() {
    let (announcer, rx) = Announcer::channel();
    let workflow = Workflow::new(&["Done"]);
    let (calls, refreshes) = (workflow.calls.clone(), workflow.refreshes.clone());
    let mut table = Table::new(config())
        .with_announcer(announcer)
        .with_hooks(TableHooks::default().with_transition(Arc::new(workflow)));
    let mut surface = ScriptedSurface::new(vec![
        ms(150),
        Step::Key(TuiEvent::Move),
        Step::WaitFor(PROMPT),
        Step::Key(TuiEvent::BackTab),
        Step::Key(TuiEvent::Submit),
        Step::WaitFor("Error: not allowed"),
        Step::Key(TuiEvent::Escape),
        Step::WaitForFront(Page::Primary),
        Step::Key(TuiEvent::Quit),
    ]);

    table.paint_on(&mut surface, issues()).unwrap();

    assert_eq!(*calls.lock().unwrap(), vec!["Done"]);
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);
    assert!(surface.line(1).contains("Open"));
    let lines = heard(&rx);
    assert_eq!(
        &lines[lines.len() - 3..],
        [
            narration::PROCESSING,
            "Error: not allowed",
            narration::TRANSITION_CANCELLED,
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cancel_while_loading_drops_late_options() {
    let (announcer, rx) = Announcer::channel();
    let mut workflow = Workflow::new(&[]);
    workflow.delay = Duration::from_millis(200);
    let calls = workflow.calls.clone();
    let mut table = Table::new(config())
        .with_announcer(announcer)
        .with_hooks(TableHooks::default().with_transition(Arc::new(workflow)));
    let mut surface = ScriptedSurface::new(vec![
        ms(150),
        Step::Key(TuiEvent::Move),
        Step::Key(TuiEvent::Escape),
        ms(400),
        Step::WaitForFront(Page::Primary),
        Step::Key(TuiEvent::Quit),
    ]);

    assert_eq!(table.paint_on(&mut surface, issues()).unwrap(), Exit::Quit);
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(
        heard(&rx),
        vec![
            "1 of 3: X-1, Open, Fix bug",
            narration::MODAL_INSTRUCTIONS,
            narration::TRANSITION_CANCELLED,
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_panicking_flow_fails_the_paint() {
    let mut table = Table::new(ResolvedConfig::default())
        .with_hooks(TableHooks::default().with_transition(Arc::new(PanickingSource)));
    let mut surface =
        ScriptedSurface::new(vec![Step::Key(TuiEvent::Move), Step::WaitFor("never drawn")]);

    let result = table.paint_on(&mut surface, issues());
    assert!(
        matches!(&result, Err(TableError::Fatal(msg)) if msg.contains("tracker unreachable")),
        "unexpected result: {result:?}"
    );
    assert!(surface.stopped);
}
