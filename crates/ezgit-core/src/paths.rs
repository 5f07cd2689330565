//! Path normalisation used for worktree identity checks.
//!
//! Two spellings of a worktree path (relative vs absolute, or reached through
//! a symlinked parent) must compare equal. Normalisation is lexical first
//! (absolute, `.`/`..` folded), then the longest existing prefix is resolved
//! through the filesystem so a path that does not exist yet still picks up
//! symlinks in its parents.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against the current directory and fold `.` and `..`
/// components lexically. Does not touch the filesystem beyond reading the
/// current directory.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(clean(&joined))
}

/// Lexically clean a path: drop `.`, resolve `..` against preceding normal
/// components. `..` at the root is discarded.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Normalise a path for equality comparison: absolute, cleaned, and
/// symlink-resolved as far as the filesystem allows.
///
/// Never fails; when the current directory is unavailable the path is only
/// cleaned.
pub fn normalize_for_compare(path: &Path) -> PathBuf {
    let absolute = absolutize(path).unwrap_or_else(|_| clean(path));
    resolve_existing_prefix(&absolute)
}

/// Canonicalise the longest existing ancestor of `path` and re-append the
/// components that do not exist yet.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        if let Ok(resolved) = std::fs::canonicalize(existing) {
            let mut out = resolved;
            for name in missing.iter().rev() {
                out.push(name);
            }
            return out;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_owned());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Reject user-supplied paths that escape upwards.
pub fn validate_path(path: &Path) -> io::Result<()> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid path: {}", path.display()),
        ));
    }
    Ok(())
}

/// Directory for the worktree named `name` under a repository root. Names
/// containing `/` become nested directories.
pub fn worktree_dir(repo_root: &Path, name: &str) -> PathBuf {
    repo_root.join(name.trim())
}
