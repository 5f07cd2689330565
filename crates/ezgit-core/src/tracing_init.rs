//! Logging setup shared by the `ezgit` binaries.
//!
//! Everything goes to stderr; stdout carries command results only, so
//! `ezgit branches | xargs ...` and `--json` output stay parseable.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the process-wide subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies, which the
/// CLI passes as `ezgit=warn` so a quiet run prints nothing but results.
/// `log_json` switches to one JSON object per event for log shippers.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    let filter = env_filter(default_filter, std::env::var("RUST_LOG").ok());
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Directive set for the subscriber. A blank `RUST_LOG` counts as unset.
fn env_filter(default_filter: &str, rust_log: Option<String>) -> EnvFilter {
    let directives = rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default_filter.to_owned());
    EnvFilter::new(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_applies_without_rust_log() {
        assert_eq!(env_filter("ezgit=warn", None).to_string(), "ezgit=warn");
        assert_eq!(
            env_filter("ezgit=warn", Some("  ".into())).to_string(),
            "ezgit=warn"
        );
    }

    #[test]
    fn rust_log_overrides_default() {
        assert_eq!(
            env_filter("ezgit=warn", Some("ezgit_core=debug".into())).to_string(),
            "ezgit_core=debug"
        );
    }
}
