//! Result types for task runs
//!
//! This module contains the per-task status and result types plus the
//! aggregate summary returned by a run, providing a centralized location
//! for output structures.

/// Lifecycle status of a flattened task. Exactly one per task at any time.
///
/// `Skipped`, `Success` and `Failed` are terminal. A task is `Running` only
/// once; retries happen inside that single occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Skipped)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        write!(f, "{}", name)
    }
}

/// Terminal outcome of one task.
///
/// `exit_code` is the process exit code, 128 + signal for signal deaths,
/// 137 for timeouts, or -1 for spawn/wait failures.
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub id: String,
    pub status: TaskStatus,
    pub exit_code: i32,
    pub message: String,
}

impl TaskResult {
    pub fn failed(id: &str, exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            status: TaskStatus::Failed,
            exit_code,
            message: message.into(),
        }
    }
}

/// Aggregate outcome of a run.
#[derive(Debug)]
pub struct RunSummary {
    /// Per-task results in flattened order; skipped tasks carry exit code 0.
    pub results: Vec<TaskResult>,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// True when no task failed without `ignore_failure`.
    pub success: bool,
}

impl RunSummary {
    pub fn status_of(&self, id: &str) -> Option<TaskStatus> {
        self.results.iter().find(|r| r.id == id).map(|r| r.status)
    }
}
