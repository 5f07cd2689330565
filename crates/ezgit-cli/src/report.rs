//! Shared formatting for command output.

use std::io::{self, Write};
use std::path::Path;

use ezgit_core::git::RepairReport;
use ezgit_core::{GitError, WorktreeOutcome};

/// One line per worktree request outcome.
pub fn write_outcome(w: &mut impl Write, path: &Path, outcome: WorktreeOutcome) -> io::Result<()> {
    match outcome {
        WorktreeOutcome::Created => writeln!(w, "✓ Worktree created: {}", path.display()),
        WorktreeOutcome::AlreadyPresent => {
            writeln!(w, "✓ Worktree already present: {}", path.display())
        }
    }
}

/// Results of a per-branch creation run. Failures are printed as warnings.
///
/// Returns the number of failed branches.
pub fn write_branch_results(
    w: &mut impl Write,
    repo_root: &Path,
    results: &[(String, Result<WorktreeOutcome, GitError>)],
) -> io::Result<usize> {
    let mut failed = 0;
    for (branch, result) in results {
        match result {
            Ok(outcome) => write_outcome(w, &ezgit_core::paths::worktree_dir(repo_root, branch), *outcome)?,
            Err(e) => {
                failed += 1;
                writeln!(w, "Warning: failed to create worktree for {branch}: {e}")?;
            }
        }
    }
    Ok(failed)
}

pub fn write_repair_report(w: &mut impl Write, report: &RepairReport) -> io::Result<()> {
    if !report.deleted.is_empty() {
        writeln!(
            w,
            "Removed {} local branch(es) now tracked as origin/*",
            report.deleted.len()
        )?;
    }
    for skipped in &report.skipped {
        writeln!(w, "Warning: kept local branch {}: {}", skipped.name, skipped.reason)?;
    }
    Ok(())
}
