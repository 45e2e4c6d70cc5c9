//! Analysis task state and progress reporting
//!
//! Each analysis run moves through an explicit state machine and emits
//! [`TaskProgress`] snapshots through a [`ProgressSink`]. The Telegram front
//! end renders the snapshots into an edited status message, the CLI logs them.

use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::core::error::{AppError, AppResult};

/// Lifecycle of one analysis task
///
/// `Completed` and `Failed` are terminal: once a task reaches either, no
/// further transition is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl TaskState {
    /// Whether a transition to `next` is allowed from this state
    pub fn can_transition_to(self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Idle, TaskState::Running)
                | (TaskState::Running, TaskState::Completed)
                | (TaskState::Running, TaskState::Failed)
        )
    }

    /// Whether the task has reached a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskState::Idle => "idle",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// Thread-safe tracker enforcing the task state machine
#[derive(Debug)]
pub struct TaskTracker {
    state: Mutex<TaskState>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TaskState::Idle),
        }
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Move the task to a new state, rejecting illegal transitions
    pub fn transition(&self, next: TaskState) -> AppResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.can_transition_to(next) {
            return Err(AppError::internal_in(
                format!("Illegal task transition {} -> {}", state, next),
                "task-tracker",
            ));
        }
        *state = next;
        Ok(())
    }

    pub fn start(&self) -> AppResult<()> {
        self.transition(TaskState::Running)
    }

    pub fn complete(&self) -> AppResult<()> {
        self.transition(TaskState::Completed)
    }

    pub fn fail(&self) -> AppResult<()> {
        self.transition(TaskState::Failed)
    }
}

impl Default for TaskTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline stage of a wallet analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Blacklist,
    Certificate,
    History,
    Filtering,
    Pools,
    Fees,
    Reporting,
}

impl AnalysisStage {
    /// Human-readable label used in status messages
    pub fn label(self) -> &'static str {
        match self {
            AnalysisStage::Blacklist => "🛡 Checking blacklist",
            AnalysisStage::Certificate => "🎖 Checking LP Army certificate",
            AnalysisStage::History => "📜 Fetching transaction history",
            AnalysisStage::Filtering => "🔎 Filtering DLMM transactions",
            AnalysisStage::Pools => "🌊 Extracting pools",
            AnalysisStage::Fees => "💰 Aggregating claimed fees",
            AnalysisStage::Reporting => "📊 Building report",
        }
    }
}

/// One progress snapshot of a running analysis
#[derive(Debug, Clone)]
pub struct TaskProgress {
    /// Wallet currently being analyzed
    pub wallet: String,

    /// Pipeline stage
    pub stage: AnalysisStage,

    /// Items processed within the stage
    pub current: usize,

    /// Total items in the stage, when known up front
    pub total: Option<usize>,
}

impl TaskProgress {
    pub fn stage_only(wallet: impl Into<String>, stage: AnalysisStage) -> Self {
        Self {
            wallet: wallet.into(),
            stage,
            current: 0,
            total: None,
        }
    }

    pub fn counted(
        wallet: impl Into<String>,
        stage: AnalysisStage,
        current: usize,
        total: usize,
    ) -> Self {
        Self {
            wallet: wallet.into(),
            stage,
            current,
            total: Some(total),
        }
    }
}

impl fmt::Display for TaskProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total {
            Some(total) => write!(f, "{}... {}/{}", self.stage.label(), self.current, total),
            None => write!(f, "{}...", self.stage.label()),
        }
    }
}

/// Consumer of progress snapshots
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, progress: &TaskProgress);
}

/// Sink that drops all progress updates
pub struct NullProgressSink;

#[async_trait]
impl ProgressSink for NullProgressSink {
    async fn report(&self, _progress: &TaskProgress) {}
}

/// Sink that logs progress through tracing, used by the CLI front end
pub struct LogProgressSink;

#[async_trait]
impl ProgressSink for LogProgressSink {
    async fn report(&self, progress: &TaskProgress) {
        info!(wallet = %progress.wallet, "{}", progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let tracker = TaskTracker::new();
        assert_eq!(tracker.state(), TaskState::Idle);
        tracker.start().unwrap();
        assert_eq!(tracker.state(), TaskState::Running);
        tracker.complete().unwrap();
        assert_eq!(tracker.state(), TaskState::Completed);
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let tracker = TaskTracker::new();
        tracker.start().unwrap();
        tracker.fail().unwrap();
        assert!(tracker.start().is_err());
        assert!(tracker.complete().is_err());
        assert_eq!(tracker.state(), TaskState::Failed);
    }

    #[test]
    fn test_cannot_complete_before_start() {
        let tracker = TaskTracker::new();
        assert!(tracker.complete().is_err());
        assert!(tracker.fail().is_err());
        assert_eq!(tracker.state(), TaskState::Idle);
    }

    #[test]
    fn test_progress_display() {
        let counted = TaskProgress::counted("WalletA", AnalysisStage::Filtering, 25, 100);
        assert_eq!(
            counted.to_string(),
            "🔎 Filtering DLMM transactions... 25/100"
        );

        let stage_only = TaskProgress::stage_only("WalletA", AnalysisStage::Blacklist);
        assert_eq!(stage_only.to_string(), "🛡 Checking blacklist...");
    }
}
