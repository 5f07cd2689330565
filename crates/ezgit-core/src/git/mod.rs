//! Git-backed repository operations.
//!
//! Everything here shells out to the `git` binary, one awaited subprocess
//! per step:
//! - [`convert_to_bare`]: turn a working copy into a bare-store layout
//! - [`configure_bare_remote`]: fix remote tracking after a bare clone
//! - [`is_registered`]: path-normalised worktree registration check
//! - [`create_worktree`]: idempotent worktree creation in three modes
//! - [`list_branches`]: merged, normalised branch universe

mod branches;
mod clone;
mod command;
mod convert;
mod error;
mod registry;
mod remote;
mod worktree;

/// The only remote ezgit manages.
pub const DEFAULT_REMOTE: &str = "origin";

pub use branches::{head_branch, list_branches, list_local_branches, merge_branch_listings, normalize_branch_name};
pub use clone::{CloneOptions, clone, parse_owner_repo, parse_repo_url};
pub use command::{Git, GitOutput};
pub use convert::convert_to_bare;
pub use error::{ConversionStep, GitError, RepairStep};
pub use registry::{has_worktrees, is_registered, list_worktrees, parse_porcelain_paths, registered_worktrees};
pub use remote::{ORIGIN_FETCH_REFSPEC, RepairReport, SkippedBranch, configure_bare_remote};
pub use worktree::{
    WorktreeOutcome, WorktreeRequest, create_detached_worktree, create_feature_worktree,
    create_tracking_worktree, create_worktree,
};
