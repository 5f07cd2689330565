//! Worktree registration lookups.
//!
//! Registration is decided by comparing normalised paths, so a relative
//! spelling or a symlinked parent directory still matches the absolute path
//! git recorded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{Git, GitError};
use crate::paths::normalize_for_compare;

/// Extract the `worktree <path>` entries from `git worktree list --porcelain`.
pub fn parse_porcelain_paths(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("worktree "))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Every path registered against the metadata store, including the store
/// itself for bare repositories.
pub async fn registered_worktrees(git: &Git, metadata_path: &Path) -> Result<Vec<PathBuf>, GitError> {
    let output = git
        .stdout(Some(metadata_path), ["worktree", "list", "--porcelain"])
        .await?;
    Ok(parse_porcelain_paths(&output))
}

/// Whether `candidate` is already a registered worktree of `metadata_path`.
pub async fn is_registered(git: &Git, metadata_path: &Path, candidate: &Path) -> Result<bool, GitError> {
    let target = normalize_for_compare(candidate);
    let registered = registered_worktrees(git, metadata_path).await?;
    Ok(registered
        .iter()
        .any(|p| normalize_for_compare(p) == target))
}

/// Names of the worktrees under a repository root, relative to that root.
///
/// The root itself and its `.git` metadata directory are skipped. Worktrees
/// registered outside the root are reported by their final path component.
pub async fn list_worktrees(git: &Git, repo_root: &Path) -> Result<Vec<String>, GitError> {
    let registered = registered_worktrees(git, repo_root).await?;
    Ok(worktree_names(repo_root, &registered))
}

/// Whether a repository root has at least one worktree besides itself.
pub async fn has_worktrees(git: &Git, repo_root: &Path) -> Result<bool, GitError> {
    Ok(!list_worktrees(git, repo_root).await?.is_empty())
}

fn worktree_names(repo_root: &Path, registered: &[PathBuf]) -> Vec<String> {
    let root = normalize_for_compare(repo_root);
    let metadata = root.join(".git");
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for path in registered {
        let path = normalize_for_compare(path);
        if path == root || path == metadata {
            continue;
        }
        let name = match path.strip_prefix(&root) {
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let name = name.trim().to_string();
        if name.is_empty() || name == ".git" {
            continue;
        }
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE_LISTING: &str = "\
worktree /repos/app/.git
bare

worktree /repos/app/main
HEAD 1111111111111111111111111111111111111111
branch refs/heads/main

worktree /repos/app/feature/x
HEAD 2222222222222222222222222222222222222222
branch refs/heads/feature/x

worktree /elsewhere/review
HEAD 1111111111111111111111111111111111111111
detached
";

    #[test]
    fn parses_porcelain_entries() {
        let paths = parse_porcelain_paths(BARE_LISTING);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/repos/app/.git"),
                PathBuf::from("/repos/app/main"),
                PathBuf::from("/repos/app/feature/x"),
                PathBuf::from("/elsewhere/review"),
            ]
        );
    }

    #[test]
    fn parses_listing_without_trailing_blank_line() {
        let paths = parse_porcelain_paths("worktree /a\nbare");
        assert_eq!(paths, vec![PathBuf::from("/a")]);
    }

    #[test]
    fn names_skip_root_and_metadata() {
        let paths = parse_porcelain_paths(BARE_LISTING);
        let names = worktree_names(Path::new("/repos/app"), &paths);
        assert_eq!(names, vec!["main", "feature/x", "review"]);
    }

    #[test]
    fn names_are_deduplicated() {
        let paths = vec![
            PathBuf::from("/repos/app/main"),
            PathBuf::from("/repos/app/./main"),
        ];
        assert_eq!(worktree_names(Path::new("/repos/app"), &paths), vec!["main"]);
    }
}
