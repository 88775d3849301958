//! Demo issue tracker behind the `trackview` binary.
//!
//! Records come from a JSON file or a built-in sample and live in memory.
//! Transitions follow a fixed workflow and are written back to the shared
//! list, so a refresh shows them.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use trackview::core::detail::DetailSource;
use trackview::core::transition::{
    StateRefresh, TransitionHandler, TransitionRequest, TransitionSource,
};
use trackview::{DetailError, HandlerError, TableData, TableHooks};

pub const WORKFLOW: [&str; 4] = ["Open", "In Progress", "In Review", "Done"];

const COLUMNS: [&str; 5] = ["KEY", "STATUS", "SUMMARY", "ASSIGNEE", "UPDATED"];

/// Simulated remote latency for the detail view and transitions.
const LATENCY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Issue {
    pub key: String,
    pub status: String,
    pub summary: String,
    #[serde(default)]
    pub assignee: Option<String>,
    pub updated: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

/// The in-memory tracker shared by every hook.
#[derive(Debug, Clone, Default)]
pub struct Store(Arc<Mutex<Vec<Issue>>>);

impl Store {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self(Arc::new(Mutex::new(issues)))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Issue>> {
        // A panicking hook can't leave an issue half-written
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The issue shown on table row `row` (row 0 is the header).
    pub fn issue(&self, row: usize) -> Option<Issue> {
        row.checked_sub(1).and_then(|i| self.lock().get(i).cloned())
    }

    pub fn set_status(&self, key: &str, status: &str) -> bool {
        let mut issues = self.lock();
        let Some(issue) = issues.iter_mut().find(|i| i.key == key) else {
            return false;
        };
        issue.status = status.to_string();
        issue.updated = Utc::now();
        true
    }

    pub fn table(&self) -> TableData {
        let issues = self.lock();
        let mut rows = Vec::with_capacity(issues.len() + 1);
        rows.push(COLUMNS.iter().map(|c| c.to_string()).collect());
        for issue in issues.iter() {
            rows.push(vec![
                issue.key.clone(),
                issue.status.clone(),
                issue.summary.clone(),
                issue.assignee.clone().unwrap_or_else(|| "Unassigned".to_string()),
                issue.updated.format("%Y-%m-%d %H:%M").to_string(),
            ]);
        }
        TableData::new(rows)
    }

    pub fn replace(&self, issues: Vec<Issue>) {
        *self.lock() = issues;
    }
}

pub fn load_issues(path: &Path) -> io::Result<Vec<Issue>> {
    let contents = fs::read_to_string(path)?;
    let issues: Vec<Issue> = serde_json::from_str(&contents)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    info!("Loaded {} issues from {}", issues.len(), path.display());
    Ok(issues)
}

pub fn sample_issues() -> Vec<Issue> {
    let now = Utc::now();
    let issue = |key: &str, status: &str, summary: &str, assignee: Option<&str>, hours: i64| Issue {
        key: key.to_string(),
        status: status.to_string(),
        summary: summary.to_string(),
        assignee: assignee.map(str::to_string),
        updated: now - ChronoDuration::hours(hours),
        description: Some(format!("{summary}.\n\nReported against the demo project.")),
    };
    vec![
        issue("DEMO-1", "Open", "Login page rejects valid passwords", Some("ana"), 2),
        issue("DEMO-2", "In Progress", "Add CSV export to reports", Some("ben"), 5),
        issue("DEMO-3", "In Review", "Upgrade TLS library", None, 26),
        issue("DEMO-4", "Done", "Fix typo in onboarding email", Some("cho"), 72),
        issue("DEMO-5", "Open", "Dashboard slow with many widgets", Some("ana"), 90),
        issue("DEMO-6", "Open", "Document the release process", None, 200),
    ]
}

// ============================================================================
// Clipboard
// ============================================================================

/// Places `text` on the system clipboard through the terminal (OSC 52).
pub fn copy_to_clipboard(text: &str) {
    let mut stdout = io::stdout();
    if let Err(e) = write_osc52(&mut stdout, text) {
        warn!("Failed to copy to clipboard: {}", e);
    }
}

fn write_osc52(writer: &mut impl Write, text: &str) -> io::Result<()> {
    let encoded = STANDARD.encode(text.as_bytes());
    write!(writer, "\x1b]52;c;{encoded}\x07")?;
    writer.flush()
}

// ============================================================================
// Hooks
// ============================================================================

pub struct IssueDetail {
    store: Store,
}

#[async_trait]
impl DetailSource for IssueDetail {
    async fn render(&self, row: usize, _col: usize, data: TableData) -> Result<String, DetailError> {
        tokio::time::sleep(LATENCY).await;
        let issue = self
            .store
            .issue(row)
            .ok_or_else(|| DetailError::Fetch(format!("no issue on row {row}")))?;
        if issue.key != data.get(Some(row), Some(0)) {
            return Err(DetailError::Fetch(format!("{} changed since the table was drawn", issue.key)));
        }
        Ok(render_issue(&issue))
    }
}

pub fn render_issue(issue: &Issue) -> String {
    let mut out = format!(
        "{} · {}\n\n  Status:   {}\n  Assignee: {}\n  Updated:  {}\n",
        issue.key,
        issue.summary,
        issue.status,
        issue.assignee.as_deref().unwrap_or("Unassigned"),
        issue.updated.to_rfc3339(),
    );
    if let Some(description) = &issue.description {
        out.push('\n');
        out.push_str(description);
        out.push('\n');
    }
    out
}

pub struct Workflow {
    store: Store,
}

#[async_trait]
impl TransitionSource for Workflow {
    async fn prepare(&self, row: usize, _col: usize) -> TransitionRequest {
        tokio::time::sleep(LATENCY).await;
        let (key, current) = self
            .store
            .issue(row)
            .map(|i| (i.key, i.status))
            .unwrap_or_default();
        let handler = Arc::new(WorkflowHandler {
            store: self.store.clone(),
            key: key.clone(),
            current: current.clone(),
        });
        TransitionRequest::new(key, WORKFLOW, handler)
            .with_current_state(current)
            .with_refresh(StateRefresh::new(|data, row, _col, state| {
                let status = data.get_index("STATUS");
                data.update(Some(row), status, state);
            }))
    }
}

struct WorkflowHandler {
    store: Store,
    key: String,
    current: String,
}

#[async_trait]
impl TransitionHandler for WorkflowHandler {
    async fn transition(&self, state: &str) -> Result<(), HandlerError> {
        tokio::time::sleep(LATENCY).await;
        check_transition(&self.current, state)?;
        if !self.store.set_status(&self.key, state) {
            return Err(HandlerError::new(format!("{} no longer exists", self.key)));
        }
        info!("{} moved from {} to {}", self.key, self.current, state);
        Ok(())
    }
}

/// The demo workflow allows any move except reopening a finished issue.
pub fn check_transition(from: &str, to: &str) -> Result<(), HandlerError> {
    if from == to {
        return Err(HandlerError::new(format!("issue is already {to}")));
    }
    if from == "Done" && to == "Open" {
        return Err(HandlerError::new("done issues cannot be reopened"));
    }
    Ok(())
}

pub fn hooks(store: &Store) -> TableHooks {
    TableHooks::default()
        .with_selected(|row, _col, data| {
            info!("Selected {}", data.get(Some(row), Some(0)));
        })
        .with_copy(|row, _col, data| {
            if let Some(cells) = data.row(row) {
                copy_to_clipboard(&cells.join("\t"));
            }
        })
        .with_copy_key(|row, _col, data| copy_to_clipboard(data.get(Some(row), Some(0))))
        .with_detail(Arc::new(IssueDetail {
            store: store.clone(),
        }))
        .with_transition(Arc::new(Workflow {
            store: store.clone(),
        }))
        .with_refresh(|| info!("Refresh requested"))
}
