//! Run result types.

use crate::state::StagePayload;

/// Exit code for a successful run.
pub const EXIT_OK: u8 = 0;
/// Exit code for a failed run.
pub const EXIT_ERROR: u8 = 1;

/// Status of a stage run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every unit was processed
    Success,
    /// The run aborted on its first failing unit
    Failure,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failure => write!(f, "failure"),
        }
    }
}

/// Outcome of one stage invocation.
///
/// `data` is the outbound payload for the next chained stage. On failure it
/// holds whatever units were processed before the abort; already-written
/// files are not rolled back.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Overall status
    pub status: RunStatus,
    /// Human-readable summary or error message
    pub message: String,
    /// Outbound payload for the next stage
    pub data: StagePayload,
}

impl RunResult {
    /// Create a successful result.
    pub fn success(message: impl Into<String>, data: StagePayload) -> Self {
        Self { status: RunStatus::Success, message: message.into(), data }
    }

    /// Create a failed result.
    pub fn error(message: impl Into<String>, data: StagePayload) -> Self {
        Self { status: RunStatus::Failure, message: message.into(), data }
    }

    /// Check if the run succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self.status, RunStatus::Success)
    }

    /// Process exit code for this result.
    pub fn exit_code(&self) -> u8 {
        match self.status {
            RunStatus::Success => EXIT_OK,
            RunStatus::Failure => EXIT_ERROR,
        }
    }
}
