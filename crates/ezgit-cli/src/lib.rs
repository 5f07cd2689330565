//! ezgit CLI Library
//!
//! Subcommand implementations for the `ezgit` binary. Each command writes
//! user-facing progress to the writer it is given.

pub mod clone_cmd;
pub mod convert_cmd;
pub mod repo_cmd;
pub mod report;
pub mod worktree_cmd;
