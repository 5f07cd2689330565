//! `ezgit repair` and `ezgit branches`.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use ezgit_core::Git;
use ezgit_core::git::{configure_bare_remote, list_branches};

use crate::report::write_repair_report;

/// Arguments for the `repair` subcommand.
#[derive(Debug, Args)]
pub struct RepairArgs {
    /// Path to the bare metadata store (usually `<root>/.git`)
    pub metadata: PathBuf,

    /// Branch to keep as a local branch
    #[arg(long)]
    pub default_branch: String,
}

/// Arguments for the `branches` subcommand.
#[derive(Debug, Args)]
pub struct BranchesArgs {
    /// Repository root, working copy or metadata store
    pub path: PathBuf,

    /// Print a JSON array instead of one name per line
    #[arg(long)]
    pub json: bool,
}

/// Execute the `repair` subcommand.
pub async fn repair(git: &Git, args: RepairArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let default_branch = args.default_branch.trim();
    let report = configure_bare_remote(git, &args.metadata, default_branch)
        .await
        .with_context(|| format!("failed to repair {}", args.metadata.display()))?;
    write_repair_report(out, &report)?;
    writeln!(out, "✓ Remote tracking configured for origin")?;
    Ok(())
}

/// Execute the `branches` subcommand.
pub async fn branches(git: &Git, args: BranchesArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let names = list_branches(git, &args.path)
        .await
        .context("failed to list branches")?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&names)?)?;
    } else {
        for name in &names {
            writeln!(out, "{name}")?;
        }
    }
    Ok(())
}
