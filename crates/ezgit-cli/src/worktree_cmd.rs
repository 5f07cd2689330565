//! CLI worktree subcommands.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use serde::Serialize;

use ezgit_core::git::{create_worktree, list_worktrees};
use ezgit_core::paths::worktree_dir;
use ezgit_core::policy::validate_branch_name;
use ezgit_core::{Git, WorktreeRequest};

use crate::report::write_outcome;

/// Worktree subcommand actions.
#[derive(Subcommand, Debug)]
pub enum WorktreeAction {
    /// Create a worktree, or confirm one is already registered at the path
    Add {
        /// Path to the bare metadata store
        metadata: PathBuf,
        /// Directory for the new worktree
        path: PathBuf,
        /// Branch to check out, start point with --detach, or new branch with --base
        #[arg(value_name = "REF")]
        reference: String,
        /// Check out REF with no branch
        #[arg(long, conflicts_with = "base")]
        detach: bool,
        /// Create branch REF from this base
        #[arg(long)]
        base: Option<String>,
    },
    /// List worktrees under a repository root
    List {
        /// Repository root holding the `.git` metadata store
        root: PathBuf,
        /// Print JSON instead of one name per line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct WorktreeEntry {
    name: String,
    path: PathBuf,
}

impl WorktreeAction {
    fn request(reference: &str, detach: bool, base: Option<&str>) -> anyhow::Result<WorktreeRequest> {
        let reference = reference.trim();
        Ok(match (detach, base) {
            (true, _) => WorktreeRequest::detached(reference),
            (false, Some(base)) => {
                validate_branch_name(reference)?;
                WorktreeRequest::feature(reference, base.trim())
            }
            (false, None) => WorktreeRequest::tracking(reference),
        })
    }
}

/// Execute a worktree subcommand.
pub async fn run(git: &Git, action: WorktreeAction, out: &mut impl Write) -> anyhow::Result<()> {
    match action {
        WorktreeAction::Add {
            metadata,
            path,
            reference,
            detach,
            base,
        } => {
            let request = WorktreeAction::request(&reference, detach, base.as_deref())?;
            let outcome = create_worktree(git, &metadata, &path, &request)
                .await
                .with_context(|| format!("failed to create worktree at {}", path.display()))?;
            write_outcome(out, &path, outcome)?;
        }
        WorktreeAction::List { root, json } => {
            let names = list_worktrees(git, &root)
                .await
                .with_context(|| format!("failed to list worktrees of {}", root.display()))?;
            if json {
                let entries: Vec<WorktreeEntry> = names
                    .into_iter()
                    .map(|name| WorktreeEntry {
                        path: worktree_dir(&root, &name),
                        name,
                    })
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
            } else if names.is_empty() {
                writeln!(out, "No worktrees found.")?;
            } else {
                for name in &names {
                    writeln!(out, "{name}")?;
                }
                writeln!(out, "\n{} worktree(s)", names.len())?;
            }
        }
    }
    Ok(())
}
