//! In-place conversion of a working copy into a bare metadata store.
//!
//! The bare clone is staged next to the repository root (same parent, so
//! the final move is a rename on one filesystem). The root's contents are
//! only removed once the staged clone exists. The staging directory is
//! cleaned up if the clone step fails, and kept (and reported) if a later
//! step fails. Roots that are already bare, or have linked worktrees, are
//! refused before anything is staged.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::registry::registered_worktrees;
use super::{ConversionStep, Git, GitError};
use crate::paths::{absolutize, normalize_for_compare};

/// Removes the staging directory on drop unless disarmed.
struct StagingDir {
    path: PathBuf,
    armed: bool,
}

impl StagingDir {
    const fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    const fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed staging directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove staging directory"),
        }
    }
}

/// Reserve a unique, currently non-existent path next to `root`.
fn reserve_staging_path(root: &Path) -> Result<PathBuf, GitError> {
    let failed = |detail: String| GitError::ConversionFailed {
        step: ConversionStep::ReserveStaging,
        detail,
    };
    let parent = root
        .parent()
        .ok_or_else(|| failed(format!("{} has no parent directory", root.display())))?;
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let dir = tempfile::Builder::new()
        .prefix(&format!(".{name}.bare-"))
        .tempdir_in(parent)
        .map_err(|e| failed(e.to_string()))?;
    let path = dir.path().to_path_buf();
    dir.close().map_err(|e| failed(e.to_string()))?;
    Ok(path)
}

/// Convert the working copy at `path` into a bare store at `path/.git`.
///
/// Returns the metadata path. After success the root holds only `.git`;
/// uncommitted working files are gone. A root that is already a bare store,
/// or whose repository has linked worktrees, is refused untouched.
pub async fn convert_to_bare(git: &Git, path: &Path) -> Result<PathBuf, GitError> {
    let root = absolutize(path)?;
    if !tokio::fs::try_exists(&root).await? {
        return Err(GitError::NotFound(root));
    }
    let metadata_path = root.join(".git");
    if !tokio::fs::metadata(&metadata_path)
        .await
        .is_ok_and(|m| m.is_dir())
    {
        return Err(GitError::NotAGitRepo(root));
    }
    check_source(git, &root, &metadata_path).await?;

    let mut staging = StagingDir::new(reserve_staging_path(&root)?);
    debug!(root = %root.display(), staging = %staging.path.display(), "Reserved staging directory");

    let args: [&OsStr; 4] = [
        OsStr::new("clone"),
        OsStr::new("--bare"),
        root.as_os_str(),
        staging.path.as_os_str(),
    ];
    let out = git
        .run(None, args)
        .await
        .map_err(|e| GitError::ConversionFailed {
            step: ConversionStep::BareClone,
            detail: e.to_string(),
        })?;
    if !out.success() {
        return Err(GitError::ConversionFailed {
            step: ConversionStep::BareClone,
            detail: out.diagnostic(),
        });
    }

    // From here on the staged clone may be the only complete copy of the
    // history, so it must survive any failure.
    staging.disarm();
    let metadata_path = swap_in_bare_clone(&root, &staging.path).await?;

    info!(root = %root.display(), "Converted repository to bare layout");
    Ok(metadata_path)
}

/// Refuse roots that are not a plain working copy: an existing bare store
/// (a second conversion would wipe its worktrees) or a repository with
/// linked worktrees.
async fn check_source(git: &Git, root: &Path, metadata_path: &Path) -> Result<(), GitError> {
    let refuse = |detail: String| GitError::ConversionFailed {
        step: ConversionStep::CheckSource,
        detail,
    };

    let bare = git
        .stdout(Some(metadata_path), ["rev-parse", "--is-bare-repository"])
        .await
        .map_err(|_| GitError::NotAGitRepo(root.to_path_buf()))?;
    if bare.trim() == "true" {
        return Err(refuse(format!(
            "{} is already a bare repository",
            metadata_path.display()
        )));
    }

    let linked: Vec<PathBuf> = registered_worktrees(git, metadata_path)
        .await?
        .into_iter()
        .filter(|p| normalize_for_compare(p) != normalize_for_compare(root))
        .collect();
    if !linked.is_empty() {
        let listed = linked
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(refuse(format!("repository has linked worktrees: {listed}")));
    }
    Ok(())
}

/// Replace the contents of `root` with the staged bare clone at `staged`.
///
/// This is the irreversible part of a conversion. On failure `staged` is
/// left on disk and named in the error.
async fn swap_in_bare_clone(root: &Path, staged: &Path) -> Result<PathBuf, GitError> {
    let failed = |step: ConversionStep, e: std::io::Error| GitError::ConversionFailed {
        step,
        detail: format!("{e} (bare clone kept at {})", staged.display()),
    };

    clear_directory(root)
        .await
        .map_err(|e| failed(ConversionStep::RemoveWorkingFiles, e))?;

    let metadata_path = root.join(".git");
    tokio::fs::rename(staged, &metadata_path)
        .await
        .map_err(|e| failed(ConversionStep::SwapMetadata, e))?;
    Ok(metadata_path)
}

/// Remove every entry directly under `dir`, leaving `dir` itself.
async fn clear_directory(dir: &Path) -> std::io::Result<()> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let file_type = entry.file_type().await?;
        let result = if file_type.is_dir() {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };
        result.map_err(|e| std::io::Error::new(e.kind(), format!("failed to remove {}: {e}", path.display())))?;
    }
    Ok(())
}
