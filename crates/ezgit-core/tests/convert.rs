#![allow(clippy::unwrap_used)] // Integration tests use unwrap for brevity

//! Bare conversion of working copies, end to end.

mod common;

use common::{entry_names, git, run_git, snapshot, working_copy};
use ezgit_core::git::{
    ConversionStep, GitError, WorktreeOutcome, convert_to_bare, create_tracking_worktree,
    list_branches,
};
use ezgit_core::Git;

#[tokio::test]
async fn convert_produces_bare_repository() {
    let (_tmp, root) = working_copy();

    let metadata = convert_to_bare(&git(), &root).await.unwrap();

    assert_eq!(metadata, root.join(".git"));
    assert_eq!(entry_names(&root), vec![".git"]);
    assert!(!root.join("README.md").exists());
    assert_eq!(
        run_git(&metadata, &["rev-parse", "--is-bare-repository"]),
        "true"
    );
}

#[tokio::test]
async fn convert_leaves_no_staging_directory() {
    let (tmp, root) = working_copy();
    convert_to_bare(&git(), &root).await.unwrap();
    assert_eq!(entry_names(tmp.path()), vec!["app"]);
}

#[tokio::test]
async fn converted_repo_lists_branches_and_hosts_worktree() {
    let (_tmp, root) = working_copy();
    let git = git();

    let metadata = convert_to_bare(&git, &root).await.unwrap();
    let branches = list_branches(&git, &metadata).await.unwrap();
    assert_eq!(branches, vec!["feature-a", "main"]);

    let outcome = create_tracking_worktree(&git, &metadata, &root.join("main"), "main")
        .await
        .unwrap();
    assert_eq!(outcome, WorktreeOutcome::Created);
    assert_eq!(
        std::fs::read_to_string(root.join("main").join("README.md")).unwrap(),
        "hello\n"
    );
}

/// A git wrapper that fails `clone` and passes everything else through.
#[cfg(unix)]
fn git_failing_clone(dir: &std::path::Path) -> Git {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("git-no-clone");
    std::fs::write(
        &script,
        "#!/bin/sh\nif [ \"$1\" = clone ]; then echo 'clone refused' >&2; exit 1; fi\nexec git \"$@\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    common::GIT_ENV
        .iter()
        .fold(Git::new().with_program(&script), |git, (k, v)| git.env(*k, *v))
}

#[cfg(unix)]
#[tokio::test]
async fn failed_bare_clone_leaves_root_untouched() {
    let (tmp, root) = working_copy();
    std::fs::write(root.join("scratch.txt"), "uncommitted\n").unwrap();
    let before = snapshot(&root);
    let bin = tempfile::tempdir().unwrap();

    let err = convert_to_bare(&git_failing_clone(bin.path()), &root)
        .await
        .unwrap_err();

    assert!(
        matches!(
            err,
            GitError::ConversionFailed {
                step: ConversionStep::BareClone,
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
    assert_eq!(snapshot(&root), before);
    assert_eq!(entry_names(tmp.path()), vec!["app"]);
}

#[tokio::test]
async fn second_conversion_is_refused_and_keeps_worktrees() {
    let (_tmp, root) = working_copy();
    let git = git();
    let metadata = convert_to_bare(&git, &root).await.unwrap();
    create_tracking_worktree(&git, &metadata, &root.join("main"), "main")
        .await
        .unwrap();
    std::fs::write(root.join("main").join("wip.txt"), "unsaved work\n").unwrap();
    let before = snapshot(&root);

    let err = convert_to_bare(&git, &root).await.unwrap_err();

    assert!(
        matches!(
            err,
            GitError::ConversionFailed {
                step: ConversionStep::CheckSource,
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
    assert_eq!(snapshot(&root), before);
    assert_eq!(
        std::fs::read_to_string(root.join("main").join("wip.txt")).unwrap(),
        "unsaved work\n"
    );
}

#[tokio::test]
async fn working_copy_with_linked_worktree_is_refused() {
    let (tmp, root) = working_copy();
    let linked = tmp.path().join("app-feature");
    run_git(
        &root,
        &["worktree", "add", linked.to_str().unwrap(), "feature-a"],
    );
    let before = snapshot(&root);

    let err = convert_to_bare(&git(), &root).await.unwrap_err();

    assert!(
        matches!(
            err,
            GitError::ConversionFailed {
                step: ConversionStep::CheckSource,
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().contains("linked worktrees"), "{err}");
    assert_eq!(snapshot(&root), before);
    assert!(linked.join("README.md").exists());
}

#[tokio::test]
async fn linked_worktree_checkout_is_not_a_repo() {
    let (tmp, root) = working_copy();
    let linked = tmp.path().join("app-feature");
    run_git(
        &root,
        &["worktree", "add", linked.to_str().unwrap(), "feature-a"],
    );

    // A linked checkout has a `.git` file, not a metadata directory.
    let err = convert_to_bare(&git(), &linked).await.unwrap_err();
    assert!(matches!(err, GitError::NotAGitRepo(_)), "unexpected error: {err:?}");
    assert!(linked.join("README.md").exists());
}

#[tokio::test]
async fn missing_path_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let err = convert_to_bare(&git(), &tmp.path().join("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, GitError::NotFound(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn directory_without_metadata_is_not_a_repo() {
    let tmp = tempfile::tempdir().unwrap();
    let plain = tmp.path().join("plain");
    std::fs::create_dir(&plain).unwrap();
    std::fs::write(plain.join("file.txt"), "data").unwrap();

    let err = convert_to_bare(&git(), &plain).await.unwrap_err();
    assert!(matches!(err, GitError::NotAGitRepo(_)), "unexpected error: {err:?}");
    assert!(plain.join("file.txt").exists());
}
