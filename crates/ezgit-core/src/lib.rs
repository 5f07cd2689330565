//! ezgit Core Library
//!
//! Manages local repositories laid out as a bare metadata store (`<root>/.git`)
//! with sibling worktrees:
//! - In-place conversion of a working copy to the bare layout
//! - Remote-tracking repair after bare clones
//! - Idempotent worktree creation and branch listing
//! - Configuration, naming policy and logging setup

pub mod config;
pub mod error;
pub mod git;
pub mod metadata;
pub mod paths;
pub mod plan;
pub mod policy;
pub mod token;
pub mod tracing_init;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use git::{Git, GitError, WorktreeOutcome, WorktreeRequest};
pub use plan::WorktreePlan;
