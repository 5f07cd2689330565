//! `ezgit clone`: plain clone, or bare store plus worktrees.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Args;
use tracing::debug;

use ezgit_core::git::{
    CloneOptions, clone, configure_bare_remote, head_branch, parse_owner_repo, parse_repo_url,
};
use ezgit_core::metadata::{RepoMetadataLookup, default_branch_for};
use ezgit_core::plan::apply_plan;
use ezgit_core::policy::validate_feature_branch;
use ezgit_core::{Config, Git, WorktreePlan};

use crate::report::{write_outcome, write_repair_report};

/// Arguments for the `clone` subcommand.
#[derive(Debug, Args)]
pub struct CloneArgs {
    /// Repository as `owner/repo` or a full git URL
    pub repo: String,

    /// Destination directory (defaults to `<clone_dir>/<owner>/<repo>`)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Clone metadata into `<dest>/.git` and create worktrees
    #[arg(short, long)]
    pub worktree: bool,

    /// Shallow clone depth (0 = full history)
    #[arg(long, default_value_t = 0)]
    pub depth: u32,

    /// Check out this branch (plain clones only)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Also create a feature worktree on this new branch (worktree mode)
    #[arg(long)]
    pub feature: Option<String>,

    /// Base for --feature (defaults to the repository's default branch)
    #[arg(long, requires = "feature")]
    pub feature_base: Option<String>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `clone` subcommand.
pub async fn run(
    git: &Git,
    config: &Config,
    lookup: &dyn RepoMetadataLookup,
    args: CloneArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let worktree = args.worktree || config.git.worktree;
    if worktree && args.branch.is_some() {
        bail!(
            "--branch is not supported with --worktree; use --feature-base to control the feature worktree base branch"
        );
    }
    if !worktree && args.feature.is_some() {
        bail!("--feature and --feature-base require --worktree");
    }

    let url = parse_repo_url(&args.repo).context("invalid repo format")?;
    let (owner, name) = repo_name_parts(&args.repo);
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_dest(config, owner, name));

    if !args.quiet {
        writeln!(out, "Cloning {url} to {}", dest.display())?;
    }

    if !worktree {
        let opts = CloneOptions {
            bare: false,
            branch: args.branch.clone(),
            depth: args.depth,
            quiet: args.quiet,
        };
        clone(git, &url, &dest, &opts)
            .await
            .context("failed to clone repository")?;
        return Ok(());
    }

    tokio::fs::create_dir_all(&dest)
        .await
        .with_context(|| format!("failed to create destination directory {}", dest.display()))?;
    let metadata = dest.join(".git");
    let opts = CloneOptions {
        bare: true,
        branch: None,
        depth: args.depth,
        quiet: args.quiet,
    };
    clone(git, &url, &metadata, &opts)
        .await
        .context("failed to clone repository")?;

    // A bare clone's HEAD is the remote default branch.
    let head = head_branch(git, &metadata).await.unwrap_or_default();
    let full_name = owner.map_or_else(|| name.to_string(), |o| format!("{o}/{name}"));
    let default_branch = default_branch_for(lookup, &full_name, head.as_deref());
    debug!(repo = %full_name, default_branch = %default_branch, "Resolved default branch");

    let report = configure_bare_remote(git, &metadata, &default_branch)
        .await
        .context("failed to configure bare remote")?;
    if !args.quiet {
        write_repair_report(out, &report)?;
    }

    let feature = validate_feature_branch(
        &default_branch,
        args.feature.as_deref(),
        args.feature_base.as_deref(),
    )?;
    let plan = WorktreePlan {
        feature,
        ..WorktreePlan::default()
    };
    let done = apply_plan(git, &metadata, &dest, &default_branch, &plan)
        .await
        .with_context(|| format!("failed to create worktrees for {default_branch}"))?;
    if !args.quiet {
        for (planned, outcome) in &done {
            write_outcome(out, &planned.path, *outcome)?;
        }
    }
    Ok(())
}

/// `(owner, repo)` from shorthand or a URL; the owner is unknown for
/// single-component inputs.
fn repo_name_parts(input: &str) -> (Option<&str>, &str) {
    if let Some((owner, repo)) = parse_owner_repo(input) {
        return (Some(owner), repo);
    }
    let trimmed = input.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let mut parts = trimmed.rsplit(|c: char| c == '/' || c == ':');
    let repo = parts.next().unwrap_or(trimmed);
    let owner = parts.next().filter(|o| !o.is_empty());
    (owner, repo)
}

fn default_dest(config: &Config, owner: Option<&str>, repo: &str) -> PathBuf {
    match (config.clone_dir(), owner) {
        (Some(dir), Some(owner)) => dir.join(owner).join(repo),
        (Some(dir), None) => dir.join(repo),
        (None, _) => Path::new(".").join(repo),
    }
}
