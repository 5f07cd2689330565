//! `git clone` wrapper and repository URL parsing.

use std::ffi::OsString;
use std::path::Path;

use tracing::info;

use super::{Git, GitError};

/// Options for [`clone`].
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    pub bare: bool,
    pub branch: Option<String>,
    /// Shallow clone depth; `0` means full history.
    pub depth: u32,
    pub quiet: bool,
}

impl CloneOptions {
    fn args(&self, url: &str, dest: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["clone".into()];
        if self.bare {
            args.push("--bare".into());
        }
        if let Some(branch) = self.branch.as_deref().filter(|b| !b.is_empty()) {
            args.push("--branch".into());
            args.push(branch.into());
        }
        if self.depth > 0 {
            args.push("--depth".into());
            args.push(self.depth.to_string().into());
        }
        if self.quiet {
            args.push("--quiet".into());
        }
        args.push(url.into());
        args.push(dest.into());
        args
    }
}

/// Clone `url` into `dest`.
pub async fn clone(git: &Git, url: &str, dest: &Path, opts: &CloneOptions) -> Result<(), GitError> {
    let args = opts.args(url, dest);
    let out = git.run(None, &args).await?;
    if !out.success() {
        return Err(GitError::Command {
            command: format!("git clone {url}"),
            detail: out.diagnostic(),
        });
    }
    info!(url, dest = %dest.display(), bare = opts.bare, "Cloned repository");
    Ok(())
}

/// Turn user input into a clonable URL.
///
/// Full `git@`/`http(s)://` URLs get a `.git` suffix if missing;
/// `owner/repo` becomes a GitHub SSH URL.
pub fn parse_repo_url(input: &str) -> Result<String, GitError> {
    let input = input.trim();
    if ["git@", "https://", "http://"]
        .iter()
        .any(|scheme| input.starts_with(scheme))
    {
        return Ok(if input.ends_with(".git") {
            input.to_string()
        } else {
            format!("{input}.git")
        });
    }

    match input.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok(format!("git@github.com:{owner}/{repo}.git"))
        }
        _ => Err(GitError::InvalidName(format!(
            "invalid repo format: {input} (expected owner/repo or full URL)"
        ))),
    }
}

/// Split `owner/repo` shorthand.
pub fn parse_owner_repo(input: &str) -> Option<(&str, &str)> {
    let (owner, repo) = input.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') || owner.contains([':', '@']) {
        return None;
    }
    Some((owner, repo.trim_end_matches(".git")))
}
