//! GitHub token lookup as an injected capability.
//!
//! The `gh` CLI is slow to start, so its answer is memoised per provider
//! instance. Nothing here is process-global.
//!
//! The consumer is the repository-discovery API client, which lives outside
//! this crate and builds its chain with [`ChainedTokenProvider::from_config`].

use std::process::{Command, Stdio};
use std::sync::RwLock;

use tracing::debug;

use crate::config::GitHubConfig;

/// Something that can produce a token on demand.
pub trait TokenSource: Send + Sync {
    fn fetch(&self) -> Option<String>;
}

/// Token provider used by API clients.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Runs `gh auth token`.
#[derive(Debug, Clone, Default)]
pub struct GhCliTokenSource;

impl TokenSource for GhCliTokenSource {
    fn fetch(&self) -> Option<String> {
        let output = Command::new("gh")
            .args(["auth", "token"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .ok()?;
        if !output.status.success() {
            debug!(status = %output.status, "gh auth token failed");
            return None;
        }
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!token.is_empty()).then_some(token)
    }
}

/// Memoises the first successful fetch of a [`TokenSource`].
#[derive(Debug, Default)]
pub struct MemoizedTokenProvider<S> {
    source: S,
    cached: RwLock<Option<String>>,
}

impl<S: TokenSource> MemoizedTokenProvider<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
        }
    }
}

impl<S: TokenSource> TokenProvider for MemoizedTokenProvider<S> {
    fn token(&self) -> Option<String> {
        if let Ok(guard) = self.cached.read() {
            if let Some(token) = guard.as_ref() {
                return Some(token.clone());
            }
        }
        let token = self.source.fetch()?;
        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(token.clone());
        }
        Some(token)
    }
}

/// `gh` first, then the configured token, then `$GITHUB_TOKEN`.
pub struct ChainedTokenProvider {
    gh: Box<dyn TokenProvider>,
    configured: Option<String>,
    env_token: Option<String>,
}

impl ChainedTokenProvider {
    pub fn new(
        gh: Box<dyn TokenProvider>,
        configured: Option<String>,
        env_token: Option<String>,
    ) -> Self {
        Self {
            gh,
            configured,
            env_token,
        }
    }

    /// Chain with the real `gh` CLI, the `[github]` config table and the
    /// process environment.
    pub fn from_config(github: &GitHubConfig) -> Self {
        Self::new(
            Box::new(MemoizedTokenProvider::new(GhCliTokenSource)),
            github.token.clone(),
            std::env::var("GITHUB_TOKEN").ok(),
        )
    }
}

impl TokenProvider for ChainedTokenProvider {
    fn token(&self) -> Option<String> {
        let usable = |t: &String| !t.trim().is_empty();
        self.gh
            .token()
            .filter(usable)
            .or_else(|| self.configured.clone().filter(usable))
            .or_else(|| self.env_token.clone().filter(usable))
    }
}
