//! Naming policy applied before worktrees are created: default-branch
//! resolution and feature-branch validation.

use crate::git::GitError;

/// Directory name of the detached worktree kept for ad-hoc inspection.
pub const REVIEW_WORKTREE: &str = "review";

/// Default branch used when nothing better is known.
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// Pick the default branch from the branch universe.
///
/// Order: `explicit` if it exists, then `main`, `master`, the first listed
/// branch, `explicit` even if unlisted, and finally `main`.
pub fn resolve_default_branch(explicit: Option<&str>, branches: &[String]) -> String {
    let explicit = explicit.map(str::trim).filter(|e| !e.is_empty());
    let listed = |name: &str| branches.iter().any(|b| b.trim() == name);

    if let Some(name) = explicit.filter(|e| listed(e)) {
        return name.to_string();
    }
    for preferred in ["main", "master"] {
        if listed(preferred) {
            return preferred.to_string();
        }
    }
    if let Some(first) = branches.iter().map(|b| b.trim()).find(|b| !b.is_empty()) {
        return first.to_string();
    }
    explicit.unwrap_or(FALLBACK_DEFAULT_BRANCH).to_string()
}

/// Check a branch name against git's ref-format rules.
pub fn validate_branch_name(name: &str) -> Result<(), GitError> {
    let reject = |reason: &str| Err(GitError::InvalidName(format!("{name:?}: {reason}")));

    if name.is_empty() {
        return reject("cannot be empty");
    }
    if name == "@" {
        return reject("cannot be '@'");
    }
    if name.starts_with('-') || name.starts_with('.') {
        return reject("cannot start with '-' or '.'");
    }
    if name.ends_with('/') || name.ends_with('.') {
        return reject("cannot end with '/' or '.'");
    }
    if name.ends_with(".lock") {
        return reject("cannot end with '.lock'");
    }
    if name.contains("..") || name.contains("//") || name.contains("@{") {
        return reject("cannot contain '..', '//' or '@{'");
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '~' | '^' | ':' | '\\' | '?' | '*' | '['))
    {
        return reject("contains a forbidden character");
    }
    if name.split('/').any(|part| part.starts_with('.')) {
        return reject("path components cannot start with '.'");
    }
    Ok(())
}

/// A validated feature worktree request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    pub branch: String,
    pub base: String,
}

/// Validate the feature branch inputs against the default branch.
///
/// Returns `None` when no feature was requested. The base defaults to the
/// default branch.
pub fn validate_feature_branch(
    default_branch: &str,
    feature: Option<&str>,
    base: Option<&str>,
) -> Result<Option<FeatureSpec>, GitError> {
    let feature = feature.map(str::trim).unwrap_or_default();
    let base = base.map(str::trim).unwrap_or_default();

    if feature.is_empty() {
        if !base.is_empty() {
            return Err(GitError::InvalidName(
                "a feature base requires a feature branch".into(),
            ));
        }
        return Ok(None);
    }
    if feature == REVIEW_WORKTREE {
        return Err(GitError::InvalidName(format!(
            "feature name {feature:?} is reserved"
        )));
    }
    if feature == default_branch {
        return Err(GitError::InvalidName(format!(
            "feature name {feature:?} conflicts with the default branch worktree"
        )));
    }
    validate_branch_name(feature)?;

    let base = if base.is_empty() { default_branch } else { base };
    Ok(Some(FeatureSpec {
        branch: feature.to_string(),
        base: base.to_string(),
    }))
}

/// Ensure every selected branch is part of the branch universe.
pub fn validate_selected_branches(available: &[String], selected: &[String]) -> Result<(), GitError> {
    let missing: Vec<&str> = selected
        .iter()
        .map(|s| s.trim().trim_start_matches("origin/"))
        .filter(|s| !available.iter().any(|a| a == s))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GitError::InvalidName(format!(
            "unknown branch(es): {}",
            missing.join(", ")
        )))
    }
}
