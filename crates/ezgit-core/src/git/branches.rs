//! Branch universe of a repository: local and remote-tracking names merged.

use std::collections::BTreeSet;
use std::path::Path;

use super::{Git, GitError, DEFAULT_REMOTE};

const SHORT_REFNAME_FORMAT: &str = "--format=%(refname:short)";

/// Normalise one line of `git branch` output into a branch name.
///
/// Strips the `origin/` prefix and rejects the symbolic remote HEAD (which
/// shortens to `origin` or shows up as `HEAD`/`origin/HEAD -> ...`).
pub fn normalize_branch_name(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix(DEFAULT_REMOTE)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(trimmed);
    if name.is_empty() || name == "HEAD" || name == DEFAULT_REMOTE || name.contains("->") {
        return None;
    }
    Some(name)
}

/// Collect normalised, deduplicated and sorted branch names from raw
/// `git branch` listings.
pub fn merge_branch_listings<'a>(listings: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    listings
        .into_iter()
        .flat_map(str::lines)
        .filter_map(normalize_branch_name)
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// List every branch visible from `path`, local and remote-tracking, with
/// the remote prefix stripped.
pub async fn list_branches(git: &Git, path: &Path) -> Result<Vec<String>, GitError> {
    let remote = git
        .stdout(Some(path), ["branch", "-r", SHORT_REFNAME_FORMAT])
        .await?;
    let local = git.stdout(Some(path), ["branch", SHORT_REFNAME_FORMAT]).await?;
    Ok(merge_branch_listings([remote.as_str(), local.as_str()]))
}

/// List only the local branch names of `path`, in git's order.
pub async fn list_local_branches(git: &Git, path: &Path) -> Result<Vec<String>, GitError> {
    let local = git.stdout(Some(path), ["branch", SHORT_REFNAME_FORMAT]).await?;
    Ok(local
        .lines()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_owned)
        .collect())
}

/// Branch that `HEAD` points at, or `None` when `HEAD` is detached.
///
/// In a fresh bare clone this is the remote's default branch.
pub async fn head_branch(git: &Git, path: &Path) -> Result<Option<String>, GitError> {
    let out = git.run(Some(path), ["symbolic-ref", "--quiet", "--short", "HEAD"]).await?;
    if !out.success() {
        return Ok(None);
    }
    let name = out.stdout.trim();
    Ok((!name.is_empty()).then(|| name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_remote_prefix() {
        assert_eq!(normalize_branch_name("origin/main"), Some("main"));
        assert_eq!(normalize_branch_name("  origin/feature/x \n"), Some("feature/x"));
        assert_eq!(normalize_branch_name("develop"), Some("develop"));
    }

    #[test]
    fn rejects_symbolic_refs() {
        assert_eq!(normalize_branch_name("origin"), None);
        assert_eq!(normalize_branch_name("origin/HEAD"), None);
        assert_eq!(normalize_branch_name("HEAD"), None);
        assert_eq!(normalize_branch_name("origin/HEAD -> origin/main"), None);
        assert_eq!(normalize_branch_name(""), None);
        assert_eq!(normalize_branch_name("   "), None);
    }

    #[test]
    fn prefix_must_be_a_full_segment() {
        assert_eq!(normalize_branch_name("originals"), Some("originals"));
    }

    #[test]
    fn merge_dedupes_and_sorts() {
        let remote = "origin\norigin/main\norigin/feature-a\n";
        let local = "main\nzeta\n\n";
        assert_eq!(
            merge_branch_listings([remote, local]),
            vec!["feature-a", "main", "zeta"]
        );
    }
}
