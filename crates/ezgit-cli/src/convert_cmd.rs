//! `ezgit convert`: turn a working copy into a bare store with worktrees.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Args;

use ezgit_core::git::{convert_to_bare, list_branches};
use ezgit_core::paths::{absolutize, validate_path};
use ezgit_core::plan::{apply_plan, create_branch_worktrees};
use ezgit_core::policy::{
    FeatureSpec, resolve_default_branch, validate_feature_branch, validate_selected_branches,
};
use ezgit_core::{Git, WorktreePlan};

use crate::report::{write_branch_results, write_outcome};

/// Arguments for the `convert` subcommand.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Path to the working copy to convert
    pub path: PathBuf,

    /// Create a worktree for this branch (repeatable)
    #[arg(short = 'w', long = "worktree", conflicts_with_all = ["all_worktrees", "no_worktrees"])]
    pub worktrees: Vec<String>,

    /// Create a worktree for every branch
    #[arg(long, conflicts_with = "no_worktrees")]
    pub all_worktrees: bool,

    /// Convert only, create no worktrees
    #[arg(long)]
    pub no_worktrees: bool,

    /// Default branch (falls back to main, master, then the first branch)
    #[arg(long)]
    pub default_branch: Option<String>,

    /// Skip the detached `review` worktree
    #[arg(long)]
    pub no_review: bool,

    /// Also create a feature worktree on this new branch
    #[arg(long, conflicts_with_all = ["worktrees", "all_worktrees", "no_worktrees"])]
    pub feature: Option<String>,

    /// Base for --feature (defaults to the default branch)
    #[arg(long, requires = "feature")]
    pub feature_base: Option<String>,
}

impl ConvertArgs {
    /// Neither explicit branch selection nor opt-out: use the worktree plan.
    const fn uses_plan(&self) -> bool {
        !self.no_worktrees && !self.all_worktrees && self.worktrees.is_empty()
    }
}

/// Execute the `convert` subcommand.
pub async fn run(git: &Git, args: ConvertArgs, out: &mut impl Write) -> anyhow::Result<()> {
    validate_path(&args.path).context("invalid path")?;
    let root = absolutize(&args.path).context("failed to resolve absolute path")?;

    // Names are checked before anything destructive happens.
    let mut planned: Option<(String, Option<FeatureSpec>)> = None;
    if args.uses_plan() {
        let branches = list_branches(git, &root)
            .await
            .context("failed to list branches")?;
        let default_branch = resolve_default_branch(args.default_branch.as_deref(), &branches);
        let feature = validate_feature_branch(
            &default_branch,
            args.feature.as_deref(),
            args.feature_base.as_deref(),
        )?;
        planned = Some((default_branch, feature));
    }

    writeln!(out, "Converting {} to bare repository...", root.display())?;
    let metadata = convert_to_bare(git, &root)
        .await
        .context("failed to convert to bare")?;
    writeln!(out, "✓ Successfully converted to bare repository")?;

    if args.no_worktrees {
        writeln!(out, "Worktree creation skipped (--no-worktrees)")?;
        return Ok(());
    }

    let branches = list_branches(git, &metadata)
        .await
        .context("failed to list branches")?;

    if args.all_worktrees {
        writeln!(out, "Creating worktrees for all {} branches...", branches.len())?;
        let results = create_branch_worktrees(git, &metadata, &root, &branches).await;
        write_branch_results(out, &root, &results)?;
    } else if !args.worktrees.is_empty() {
        validate_selected_branches(&branches, &args.worktrees)
            .context("branch validation failed")?;
        writeln!(out, "Creating worktrees for {} branches...", args.worktrees.len())?;
        let results = create_branch_worktrees(git, &metadata, &root, &args.worktrees).await;
        write_branch_results(out, &root, &results)?;
    } else {
        let Some((default_branch, feature)) = planned else {
            bail!("worktree plan was not prepared");
        };
        let plan = WorktreePlan {
            default_worktree: true,
            review_worktree: !args.no_review,
            feature,
        };
        let done = apply_plan(git, &metadata, &root, &default_branch, &plan)
            .await
            .with_context(|| format!("failed to create worktrees for {default_branch}"))?;
        for (planned, outcome) in &done {
            write_outcome(out, &planned.path, *outcome)?;
        }
    }

    writeln!(out, "\n✓ Bare repository conversion complete!")?;
    Ok(())
}
