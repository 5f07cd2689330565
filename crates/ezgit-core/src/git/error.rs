//! Error taxonomy for git-backed operations.
//!
//! Every variant that wraps a failed subprocess carries git's own diagnostic
//! output verbatim in `detail`, so the operator sees the real cause.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The steps of a bare conversion, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStep {
    /// Confirming the root holds a working copy that has not been converted.
    CheckSource,
    /// Reserving a staging directory name next to the repository root.
    ReserveStaging,
    /// Cloning the working copy into the staging directory.
    BareClone,
    /// Removing the working files and old metadata from the root.
    RemoveWorkingFiles,
    /// Moving the staged bare clone into the root's `.git`.
    SwapMetadata,
}

impl fmt::Display for ConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CheckSource => "check source repository",
            Self::ReserveStaging => "reserve staging directory",
            Self::BareClone => "create bare clone",
            Self::RemoveWorkingFiles => "remove working files",
            Self::SwapMetadata => "move bare repository into place",
        };
        f.write_str(label)
    }
}

/// The fatal steps of remote-tracking repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStep {
    SetFetchRefspec,
    Fetch,
}

impl fmt::Display for RepairStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetFetchRefspec => f.write_str("set fetch refspec"),
            Self::Fetch => f.write_str("fetch from origin"),
        }
    }
}

/// Errors from git-backed repository and worktree operations.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a git repository: {}", .0.display())]
    NotAGitRepo(PathBuf),

    #[error("Conversion failed to {step}: {detail}")]
    ConversionFailed {
        step: ConversionStep,
        detail: String,
    },

    #[error("Remote repair failed to {step}: {detail}")]
    RemoteRepairFailed { step: RepairStep, detail: String },

    #[error("Worktree path {} exists but is not a registered worktree: {detail}", .path.display())]
    WorktreeConflict { path: PathBuf, detail: String },

    #[error("Failed to create worktree at {}: {detail}", .path.display())]
    WorktreeCreationFailed { path: PathBuf, detail: String },

    #[error("`{command}` failed: {detail}")]
    Command { command: String, detail: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Whether re-invoking the same operation may succeed without manual
    /// cleanup first.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteRepairFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_names_the_step() {
        let err = GitError::ConversionFailed {
            step: ConversionStep::BareClone,
            detail: "fatal: repository not found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("create bare clone"), "{msg}");
        assert!(msg.contains("fatal: repository not found"), "{msg}");
    }

    #[test]
    fn repair_errors_are_retryable() {
        let err = GitError::RemoteRepairFailed {
            step: RepairStep::Fetch,
            detail: "network unreachable".into(),
        };
        assert!(err.is_retryable());
        assert!(err.to_string().contains("fetch from origin"));
    }

    #[test]
    fn conflict_is_not_retryable() {
        let err = GitError::WorktreeConflict {
            path: PathBuf::from("/repo/review"),
            detail: "fatal: '/repo/review' already exists".into(),
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("/repo/review"));
    }
}
