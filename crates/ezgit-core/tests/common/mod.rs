//! Shared fixtures for integration tests: real repositories built with the
//! `git` binary, isolated from user configuration.

#![allow(dead_code, clippy::unwrap_used, clippy::panic)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ezgit_core::Git;
use tempfile::TempDir;

pub const GIT_ENV: [(&str, &str); 6] = [
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_NOSYSTEM", "1"),
    ("GIT_AUTHOR_NAME", "test"),
    ("GIT_AUTHOR_EMAIL", "test@example.com"),
    ("GIT_COMMITTER_NAME", "test"),
    ("GIT_COMMITTER_EMAIL", "test@example.com"),
];

pub fn git() -> Git {
    GIT_ENV
        .iter()
        .fold(Git::new(), |git, (k, v)| git.env(*k, *v))
}

pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .envs(GIT_ENV)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

pub fn init_repo(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    run_git(dir, &["init", "-q"]);
    run_git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(dir.join(name), content).unwrap();
    run_git(dir, &["add", name]);
    run_git(dir, &["commit", "-q", "-m", message]);
}

/// A normal working copy at `<tmp>/app` with commits on `main` and
/// `feature-a`, checked out on `main`.
pub fn working_copy() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("app");
    init_repo(&root);
    commit_file(&root, "README.md", "hello\n", "initial commit");
    run_git(&root, &["checkout", "-q", "-b", "feature-a"]);
    commit_file(&root, "a.txt", "a\n", "feature-a commit");
    run_git(&root, &["checkout", "-q", "main"]);
    (tmp, root)
}

/// A bare "origin" at `<tmp>/origin.git` with `main` and `feature-a`, and a
/// repository root `<tmp>/app` whose `.git` is a fresh bare clone of it.
///
/// Returns `(tmp, origin, root, metadata)`.
pub fn bare_clone_of_origin() -> (TempDir, PathBuf, PathBuf, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let origin = tmp.path().join("origin.git");
    let seed = tmp.path().join("seed");
    std::fs::create_dir_all(&origin).unwrap();
    run_git(&origin, &["init", "-q", "--bare"]);
    run_git(&origin, &["symbolic-ref", "HEAD", "refs/heads/main"]);

    init_repo(&seed);
    commit_file(&seed, "README.md", "hello\n", "initial commit");
    run_git(&seed, &["remote", "add", "origin", origin.to_str().unwrap()]);
    run_git(&seed, &["push", "-q", "origin", "HEAD:main"]);
    run_git(&seed, &["checkout", "-q", "-b", "feature-a"]);
    commit_file(&seed, "a.txt", "a\n", "feature-a commit");
    run_git(&seed, &["push", "-q", "origin", "feature-a"]);

    let root = tmp.path().join("app");
    let metadata = root.join(".git");
    run_git(
        tmp.path(),
        &[
            "clone",
            "-q",
            "--bare",
            origin.to_str().unwrap(),
            metadata.to_str().unwrap(),
        ],
    );
    (tmp, origin, root, metadata)
}

/// Every file under `dir` with its bytes, keyed by relative path.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(base: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                let rel = path.strip_prefix(base).unwrap().to_path_buf();
                out.insert(rel, std::fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(dir, dir, &mut out);
    out
}

pub fn entry_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
