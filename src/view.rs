//! Shared Page View
//!
//! The rendered page container, shared between the refresh task and the
//! HTTP handlers. The container is rewritten wholesale on every commit;
//! there is no incremental diffing.
//!
//! Commits carry a generation token taken at cycle start. A commit whose
//! token is older than the newest committed one is discarded, so a slow
//! stale cycle can never overwrite a fresher render.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::render;

/// Phase of the most recent load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// No cycle has started yet
    Idle,
    /// A cycle is in flight and nothing newer has committed
    Loading,
    /// Messages rendered
    Rendered,
    /// Manifest loaded but held no messages
    Empty,
    /// The cycle failed and the error state is rendered
    Error,
}

/// Result of one load cycle, ready to commit
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Rendered { markup: String, count: usize },
    Empty { markup: String },
    Error { markup: String, message: String },
}

/// Refresh status reported by the API
#[derive(Debug, Clone, Serialize)]
pub struct RefreshStatus {
    pub phase: CyclePhase,
    pub cycles_completed: u64,
    pub message_count: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct ViewState {
    container: String,
    phase: CyclePhase,
    committed_generation: u64,
    cycles_completed: u64,
    message_count: usize,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Shared rendered-page state
pub struct PageView {
    state: RwLock<ViewState>,
    generation: AtomicU64,
}

impl PageView {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ViewState {
                container: String::new(),
                phase: CyclePhase::Idle,
                committed_generation: 0,
                cycles_completed: 0,
                message_count: 0,
                last_updated: None,
                last_error: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Start a load cycle: clear the container, show the loading state,
    /// and hand back this cycle's generation token.
    pub async fn begin(&self) -> u64 {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut state = self.state.write().await;
        state.container.clear();
        state.phase = CyclePhase::Loading;

        token
    }

    /// Commit a cycle's output. Returns false (and changes nothing) when a
    /// newer cycle has already committed.
    pub async fn commit(&self, token: u64, outcome: CycleOutcome) -> bool {
        let mut state = self.state.write().await;
        if token < state.committed_generation {
            return false;
        }

        match outcome {
            CycleOutcome::Rendered { markup, count } => {
                state.container = markup;
                state.phase = CyclePhase::Rendered;
                state.message_count = count;
                state.last_error = None;
            }
            CycleOutcome::Empty { markup } => {
                state.container = markup;
                state.phase = CyclePhase::Empty;
                state.message_count = 0;
                state.last_error = None;
            }
            CycleOutcome::Error { markup, message } => {
                state.container = markup;
                state.phase = CyclePhase::Error;
                state.message_count = 0;
                state.last_error = Some(message);
            }
        }

        state.committed_generation = token;
        state.cycles_completed += 1;
        state.last_updated = Some(Utc::now());

        true
    }

    /// Current container markup (without the page shell)
    pub async fn container(&self) -> String {
        self.state.read().await.container.clone()
    }

    /// Full page markup. The loading indicator shows before the first
    /// cycle commits and whenever a cycle is in flight with nothing
    /// newer committed.
    pub async fn page(&self) -> String {
        let state = self.state.read().await;
        let loading = state.cycles_completed == 0 || state.phase == CyclePhase::Loading;
        render::render_page(&state.container, loading)
    }

    /// Whether at least one cycle has committed (readiness signal)
    pub async fn has_rendered(&self) -> bool {
        self.state.read().await.cycles_completed > 0
    }

    /// Snapshot of the refresh status
    pub async fn status(&self) -> RefreshStatus {
        let state = self.state.read().await;
        RefreshStatus {
            phase: state.phase,
            cycles_completed: state.cycles_completed,
            message_count: state.message_count,
            last_updated: state.last_updated,
            last_error: state.last_error.clone(),
        }
    }
}

impl Default for PageView {
    fn default() -> Self {
        Self::new()
    }
}
