//! Configuration resolution for ezgit.
//!
//! The first existing file wins:
//! 1. Explicit path (`--config`)
//! 2. `./config.toml`
//! 3. `~/.config/ezgit/config.toml`
//! 4. `~/.ezgit.toml`
//!
//! Environment variables are applied on top. A missing file is not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete ezgit configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub github: GitHubConfig,
}

/// Clone and worktree defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GitConfig {
    /// Root under which repositories are cloned as `<owner>/<repo>`.
    #[serde(default)]
    pub clone_dir: Option<String>,
    /// Clone as a bare store with worktrees by default.
    #[serde(default)]
    pub worktree: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GitHubConfig {
    #[serde(default)]
    pub token: Option<String>,
}

impl Config {
    /// Clone directory with a leading `~/` expanded.
    pub fn clone_dir(&self) -> Option<PathBuf> {
        let dir = self.git.clone_dir.as_deref()?.trim();
        if dir.is_empty() {
            return None;
        }
        Some(expand_home(dir))
    }

    /// Local path for `owner/repo` under the clone directory.
    pub fn repo_path(&self, owner: &str, repo: &str) -> Option<PathBuf> {
        self.clone_dir().map(|d| d.join(owner).join(repo))
    }
}

/// Load configuration, searching the default locations unless `explicit`
/// names an existing file.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match find_config_path(explicit) {
        Some(path) => load_config_file(&path)?,
        None => Config::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// First existing config file, if any.
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }
    let mut candidates = vec![PathBuf::from("config.toml")];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join("ezgit").join("config.toml"));
        candidates.push(home.join(".ezgit.toml"));
    }
    candidates.into_iter().find(|p| p.exists())
}

/// Parse one config file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

/// Apply `EZGIT_CLONE_DIR` and `GITHUB_TOKEN` overrides.
fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(dir) = var("EZGIT_CLONE_DIR").filter(|d| !d.trim().is_empty()) {
        config.git.clone_dir = Some(dir);
    }
    let configured = config.github.token.as_deref().is_some_and(|t| !t.trim().is_empty());
    if !configured {
        config.github.token = var("GITHUB_TOKEN").filter(|t| !t.trim().is_empty());
    }
}

fn expand_home(dir: &str) -> PathBuf {
    match (dir.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(dir),
    }
}
