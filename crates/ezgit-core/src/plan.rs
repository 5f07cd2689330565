//! Which worktrees to create after a clone or conversion.
//!
//! The standard layout under a repository root is `<default_branch>/`
//! (tracking), `review/` (detached at the default branch) and optionally a
//! feature worktree named after its branch.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::git::{Git, GitError, WorktreeOutcome, WorktreeRequest, create_worktree};
use crate::paths::worktree_dir;
use crate::policy::{FeatureSpec, REVIEW_WORKTREE};

/// Worktrees requested for a repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreePlan {
    pub default_worktree: bool,
    pub review_worktree: bool,
    pub feature: Option<FeatureSpec>,
}

impl Default for WorktreePlan {
    fn default() -> Self {
        Self {
            default_worktree: true,
            review_worktree: true,
            feature: None,
        }
    }
}

/// One concrete worktree of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWorktree {
    pub path: PathBuf,
    pub request: WorktreeRequest,
}

impl WorktreePlan {
    /// Expand the plan into concrete paths and requests, in creation order.
    pub fn worktrees(&self, repo_root: &Path, default_branch: &str) -> Vec<PlannedWorktree> {
        let mut planned = Vec::new();
        if self.default_worktree {
            planned.push(PlannedWorktree {
                path: worktree_dir(repo_root, default_branch),
                request: WorktreeRequest::tracking(default_branch),
            });
        }
        if self.review_worktree {
            planned.push(PlannedWorktree {
                path: worktree_dir(repo_root, REVIEW_WORKTREE),
                request: WorktreeRequest::detached(default_branch),
            });
        }
        if let Some(feature) = &self.feature {
            planned.push(PlannedWorktree {
                path: worktree_dir(repo_root, &feature.branch),
                request: WorktreeRequest::feature(&feature.branch, &feature.base),
            });
        }
        planned
    }
}

/// Create every worktree in the plan, stopping at the first failure.
pub async fn apply_plan(
    git: &Git,
    metadata_path: &Path,
    repo_root: &Path,
    default_branch: &str,
    plan: &WorktreePlan,
) -> Result<Vec<(PlannedWorktree, WorktreeOutcome)>, GitError> {
    let mut done = Vec::new();
    for planned in plan.worktrees(repo_root, default_branch) {
        let outcome = create_worktree(git, metadata_path, &planned.path, &planned.request).await?;
        done.push((planned, outcome));
    }
    Ok(done)
}

/// Create a tracking worktree per branch under `repo_root`.
///
/// Individual failures are logged and returned, never fatal.
pub async fn create_branch_worktrees(
    git: &Git,
    metadata_path: &Path,
    repo_root: &Path,
    branches: &[String],
) -> Vec<(String, Result<WorktreeOutcome, GitError>)> {
    let mut results = Vec::with_capacity(branches.len());
    for branch in branches {
        let branch = branch.trim().trim_start_matches("origin/").to_string();
        let path = worktree_dir(repo_root, &branch);
        let result = create_worktree(git, metadata_path, &path, &WorktreeRequest::tracking(&branch)).await;
        match &result {
            Ok(outcome) => info!(branch = %branch, ?outcome, path = %path.display(), "Branch worktree ready"),
            Err(e) => warn!(branch = %branch, error = %e, "Failed to create branch worktree"),
        }
        results.push((branch, result));
    }
    results
}
