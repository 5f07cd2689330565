//! ezgit CLI
//!
//! Keeps repositories as a bare metadata store with sibling worktrees.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use ezgit_cli::clone_cmd::{self, CloneArgs};
use ezgit_cli::convert_cmd::{self, ConvertArgs};
use ezgit_cli::repo_cmd::{self, BranchesArgs, RepairArgs};
use ezgit_cli::worktree_cmd::{self, WorktreeAction};
use ezgit_core::Git;
use ezgit_core::config::load_config;
use ezgit_core::metadata::NoMetadata;
use ezgit_core::tracing_init::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "ezgit")]
#[command(version, about = "Bare repositories with sibling worktrees", long_about = None)]
struct Cli {
    /// Config file (default: ./config.toml, ~/.config/ezgit/config.toml, ~/.ezgit.toml)
    #[arg(long, global = true, env = "EZGIT_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a working copy into a bare store with worktrees
    Convert(ConvertArgs),
    /// Clone a repository, optionally as a bare store with worktrees
    Clone(CloneArgs),
    /// Restore origin/* remote tracking in a bare store
    Repair(RepairArgs),
    /// List local and remote branches without the origin/ prefix
    Branches(BranchesArgs),
    /// Manage worktrees
    Worktree {
        #[command(subcommand)]
        action: WorktreeAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("ezgit=warn", cli.log_json);
    debug!(version = env!("CARGO_PKG_VERSION"), "Starting ezgit");

    let git = Git::new();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Convert(args) => convert_cmd::run(&git, args, &mut out).await,
        Commands::Clone(args) => {
            let config = load_config(cli.config.as_deref()).context("failed to load config")?;
            clone_cmd::run(&git, &config, &NoMetadata, args, &mut out).await
        }
        Commands::Repair(args) => repo_cmd::repair(&git, args, &mut out).await,
        Commands::Branches(args) => repo_cmd::branches(&git, args, &mut out).await,
        Commands::Worktree { action } => worktree_cmd::run(&git, action, &mut out).await,
    }
}
