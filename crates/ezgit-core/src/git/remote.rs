//! Remote-tracking repair for freshly bare-cloned repositories.
//!
//! `git clone --bare` leaves `remote.origin.fetch` unset and copies every
//! remote branch as a local branch. After repair the store has a fetch
//! refspec, populated `refs/remotes/origin/*`, and only the default branch
//! left as a local branch.

use std::path::Path;

use tracing::{debug, info, warn};

use super::branches::list_local_branches;
use super::{DEFAULT_REMOTE, Git, GitError, RepairStep};

/// Refspec mapping remote branches to remote-tracking refs.
pub const ORIGIN_FETCH_REFSPEC: &str = "+refs/heads/*:refs/remotes/origin/*";

/// A local branch that could not be deleted during repair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBranch {
    pub name: String,
    pub reason: String,
}

/// What the cleanup step did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Local branches removed because a remote-tracking ref now covers them.
    pub deleted: Vec<String>,
    /// Branches left in place, typically because a worktree has them
    /// checked out.
    pub skipped: Vec<SkippedBranch>,
}

/// Install the fetch refspec, fetch once, and drop redundant local branches.
///
/// Only the refspec and fetch steps are fatal. Cleanup failures are logged
/// and reported but never abort.
pub async fn configure_bare_remote(
    git: &Git,
    metadata_path: &Path,
    default_branch: &str,
) -> Result<RepairReport, GitError> {
    if !tokio::fs::try_exists(metadata_path).await? {
        return Err(GitError::NotFound(metadata_path.to_path_buf()));
    }

    let key = format!("remote.{DEFAULT_REMOTE}.fetch");
    let out = git
        .run(Some(metadata_path), ["config", key.as_str(), ORIGIN_FETCH_REFSPEC])
        .await?;
    if !out.success() {
        return Err(GitError::RemoteRepairFailed {
            step: RepairStep::SetFetchRefspec,
            detail: out.diagnostic(),
        });
    }

    let out = git
        .run(Some(metadata_path), ["fetch", DEFAULT_REMOTE])
        .await?;
    if !out.success() {
        return Err(GitError::RemoteRepairFailed {
            step: RepairStep::Fetch,
            detail: out.diagnostic(),
        });
    }

    let report = prune_local_branches(git, metadata_path, default_branch).await;
    info!(
        path = %metadata_path.display(),
        default_branch,
        deleted = report.deleted.len(),
        skipped = report.skipped.len(),
        "Configured bare remote tracking"
    );
    Ok(report)
}

async fn prune_local_branches(git: &Git, metadata_path: &Path, keep: &str) -> RepairReport {
    let mut report = RepairReport::default();
    let branches = match list_local_branches(git, metadata_path).await {
        Ok(branches) => branches,
        Err(e) => {
            warn!(path = %metadata_path.display(), error = %e, "Could not list local branches, skipping cleanup");
            return report;
        }
    };

    for branch in branches.into_iter().filter(|b| b != keep) {
        let result = git
            .run(Some(metadata_path), ["branch", "-D", branch.as_str()])
            .await;
        match result {
            Ok(out) if out.success() => {
                debug!(branch = %branch, "Deleted redundant local branch");
                report.deleted.push(branch);
            }
            Ok(out) => {
                let reason = out.diagnostic();
                warn!(branch = %branch, reason = %reason, "Local branch not deleted, leaving it in place");
                report.skipped.push(SkippedBranch { name: branch, reason });
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(branch = %branch, reason = %reason, "Local branch not deleted, leaving it in place");
                report.skipped.push(SkippedBranch { name: branch, reason });
            }
        }
    }
    report
}
