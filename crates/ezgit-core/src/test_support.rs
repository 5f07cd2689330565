//! Throwaway git repositories for unit tests.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::git::Git;

/// Environment that isolates git from the user's and system configuration.
pub const GIT_ENV: [(&str, &str); 6] = [
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_AUTHOR_NAME", "test"),
    ("GIT_AUTHOR_EMAIL", "test@example.com"),
    ("GIT_COMMITTER_NAME", "test"),
    ("GIT_COMMITTER_EMAIL", "test@example.com"),
];

pub fn isolated_git() -> Git {
    GIT_ENV
        .iter()
        .fold(Git::new(), |git, (k, v)| git.env(*k, *v))
}

pub fn run_git(dir: Option<&Path>, args: &[&str]) -> String {
    let mut cmd = std::process::Command::new("git");
    cmd.args(args).envs(GIT_ENV);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// `git init` with `main` as the unborn branch.
pub fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    run_git(Some(dir), &["init", "-q"]);
    run_git(Some(dir), &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(dir.join(name), content).unwrap();
    run_git(Some(dir), &["add", name]);
    run_git(Some(dir), &["commit", "-q", "-m", message]);
}

/// A repository root `<tmp>/app` holding only a bare `.git` cloned from a
/// seed repository with one commit on `main`.
///
/// Returns `(tmp, root, metadata)`.
pub fn bare_store_with_main() -> (TempDir, PathBuf, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let seed = tmp.path().join("seed");
    init_repo(&seed);
    commit_file(&seed, "README.md", "hello\n", "initial commit");

    let root = tmp.path().join("app");
    let metadata = root.join(".git");
    run_git(
        None,
        &[
            "clone",
            "-q",
            "--bare",
            seed.to_str().unwrap(),
            metadata.to_str().unwrap(),
        ],
    );
    (tmp, root, metadata)
}
