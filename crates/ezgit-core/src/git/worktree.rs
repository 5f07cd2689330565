//! Idempotent worktree creation.
//!
//! Every creation goes through [`create_worktree`]: resolve the path, skip
//! if it is already registered, otherwise run `git worktree add`. An
//! "already exists" failure is re-checked against the registry for a short
//! while, so a concurrent creator of the same path counts as success even
//! when it has created the branch but not yet registered the worktree.

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use super::registry::is_registered;
use super::{Git, GitError};
use crate::paths::absolutize;

/// How often, and how far apart, a failed add re-checks the registry for a
/// concurrent creator.
const RECONCILE_ATTEMPTS: u32 = 20;
const RECONCILE_INTERVAL: Duration = Duration::from_millis(50);

/// What to check out in a new worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorktreeRequest {
    /// Check out an existing branch.
    Tracking { branch: String },
    /// Check out a fixed commit-ish with no branch.
    Detached { start_point: String },
    /// Create `branch` from `base` and check it out.
    Feature { branch: String, base: String },
}

impl WorktreeRequest {
    pub fn tracking(branch: impl Into<String>) -> Self {
        Self::Tracking {
            branch: branch.into(),
        }
    }

    pub fn detached(start_point: impl Into<String>) -> Self {
        Self::Detached {
            start_point: start_point.into(),
        }
    }

    pub fn feature(branch: impl Into<String>, base: impl Into<String>) -> Self {
        Self::Feature {
            branch: branch.into(),
            base: base.into(),
        }
    }

    /// Full argument list for `git worktree add` targeting `path`.
    fn add_args(&self, path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["worktree".into(), "add".into()];
        match self {
            Self::Tracking { branch } => {
                args.push(path.into());
                args.push(branch.into());
            }
            Self::Detached { start_point } => {
                args.push("--detach".into());
                args.push(path.into());
                args.push(start_point.into());
            }
            Self::Feature { branch, base } => {
                args.push("-b".into());
                args.push(branch.into());
                args.push(path.into());
                args.push(base.into());
            }
        }
        args
    }

    const fn mode(&self) -> &'static str {
        match self {
            Self::Tracking { .. } => "tracking",
            Self::Detached { .. } => "detached",
            Self::Feature { .. } => "feature",
        }
    }
}

/// Result of a successful creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorktreeOutcome {
    /// This call registered the worktree.
    Created,
    /// The path was already a registered worktree, either before the call
    /// or by a concurrent creator that won the race.
    AlreadyPresent,
}

/// Create a worktree at `worktree_path`, or do nothing if one is already
/// registered there.
pub async fn create_worktree(
    git: &Git,
    metadata_path: &Path,
    worktree_path: &Path,
    request: &WorktreeRequest,
) -> Result<WorktreeOutcome, GitError> {
    if !tokio::fs::try_exists(metadata_path).await? {
        return Err(GitError::NotFound(metadata_path.to_path_buf()));
    }
    let path = absolutize(worktree_path)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    if is_registered(git, metadata_path, &path).await? {
        debug!(path = %path.display(), mode = request.mode(), "Worktree already registered");
        return Ok(WorktreeOutcome::AlreadyPresent);
    }

    add_and_reconcile(git, metadata_path, &path, request).await
}

/// Run `git worktree add` for an absolute `path` without the registration
/// pre-check, reconciling an "already exists" failure against the registry.
pub(crate) async fn add_and_reconcile(
    git: &Git,
    metadata_path: &Path,
    path: &Path,
    request: &WorktreeRequest,
) -> Result<WorktreeOutcome, GitError> {
    let out = git.run(Some(metadata_path), request.add_args(path)).await?;
    if out.success() {
        info!(path = %path.display(), mode = request.mode(), "Created worktree");
        return Ok(WorktreeOutcome::Created);
    }

    let detail = out.diagnostic();
    if is_already_exists(&detail) {
        if registered_within_grace(git, metadata_path, path).await {
            debug!(path = %path.display(), "Worktree registered concurrently, treating as present");
            return Ok(WorktreeOutcome::AlreadyPresent);
        }
        if names_occupied_path(&detail, path) && tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(GitError::WorktreeConflict {
                path: path.to_path_buf(),
                detail,
            });
        }
    }

    Err(GitError::WorktreeCreationFailed {
        path: path.to_path_buf(),
        detail,
    })
}

/// Poll the registry for `path`, giving a concurrent `git worktree add`
/// time to finish writing its administrative entry.
async fn registered_within_grace(git: &Git, metadata_path: &Path, path: &Path) -> bool {
    for attempt in 0..RECONCILE_ATTEMPTS {
        if is_registered(git, metadata_path, path).await.unwrap_or(false) {
            return true;
        }
        if attempt + 1 < RECONCILE_ATTEMPTS {
            tokio::time::sleep(RECONCILE_INTERVAL).await;
        }
    }
    false
}

/// Whether git refused because the target directory itself is in the way,
/// as opposed to the branch already existing or being checked out.
fn names_occupied_path(detail: &str, path: &Path) -> bool {
    detail.contains(&format!("'{}' already exists", path.display()))
}

/// Failures that a concurrent creator of the same worktree would cause.
fn is_already_exists(detail: &str) -> bool {
    [
        "already exists",
        "already checked out",
        "already used by worktree",
        "cannot lock ref",
    ]
        .iter()
        .any(|needle| detail.contains(needle))
}

/// Tracking worktree on an existing branch.
pub async fn create_tracking_worktree(
    git: &Git,
    metadata_path: &Path,
    worktree_path: &Path,
    branch: &str,
) -> Result<WorktreeOutcome, GitError> {
    create_worktree(git, metadata_path, worktree_path, &WorktreeRequest::tracking(branch)).await
}

/// Detached worktree at `start_point`.
pub async fn create_detached_worktree(
    git: &Git,
    metadata_path: &Path,
    worktree_path: &Path,
    start_point: &str,
) -> Result<WorktreeOutcome, GitError> {
    create_worktree(git, metadata_path, worktree_path, &WorktreeRequest::detached(start_point)).await
}

/// Feature worktree: new branch `branch` from `base`.
pub async fn create_feature_worktree(
    git: &Git,
    metadata_path: &Path,
    worktree_path: &Path,
    branch: &str,
    base: &str,
) -> Result<WorktreeOutcome, GitError> {
    create_worktree(
        git,
        metadata_path,
        worktree_path,
        &WorktreeRequest::feature(branch, base),
    )
    .await
}
