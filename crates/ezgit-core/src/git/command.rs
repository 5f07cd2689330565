//! Subprocess runner for the `git` binary.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tracing::debug;

use super::GitError;

/// Captured result of one git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Git's diagnostic for a failed call: stderr, or stdout when stderr is
    /// empty, trimmed.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            let stdout = self.stdout.trim();
            if stdout.is_empty() {
                format!("exited with {}", self.status)
            } else {
                stdout.to_string()
            }
        } else {
            stderr.to_string()
        }
    }
}

/// Handle for spawning git commands.
///
/// Holds the program name and any extra environment applied to every call,
/// so tests can isolate git from the user's configuration.
#[derive(Debug, Clone)]
pub struct Git {
    program: OsString,
    envs: Vec<(OsString, OsString)>,
}

impl Default for Git {
    fn default() -> Self {
        Self::new()
    }
}

impl Git {
    pub fn new() -> Self {
        Self {
            program: OsString::from("git"),
            envs: Vec::new(),
        }
    }

    /// Use a different git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Set an environment variable on every spawned command.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Run git to completion and capture its output.
    ///
    /// A non-zero exit is not an error here; only a failure to spawn is.
    pub async fn run<I, S>(&self, dir: Option<&Path>, args: I) -> Result<GitOutput, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&args)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let start = std::time::Instant::now();
        let output = cmd.output().await?;
        let out = GitOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            args = %render_args(&args),
            dir = %dir.map_or_else(String::new, |d| d.display().to_string()),
            status = %out.status,
            elapsed_ms = start.elapsed().as_millis(),
            "git finished"
        );
        Ok(out)
    }

    /// Run git and return stdout, failing with [`GitError::Command`] on a
    /// non-zero exit.
    pub async fn stdout<I, S>(&self, dir: Option<&Path>, args: I) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let out = self.run(dir, &args).await?;
        if out.success() {
            Ok(out.stdout)
        } else {
            Err(GitError::Command {
                command: format!("git {}", render_args(&args)),
                detail: out.diagnostic(),
            })
        }
    }
}

fn render_args(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
