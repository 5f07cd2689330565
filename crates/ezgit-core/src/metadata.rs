//! Repository metadata lookup seam.
//!
//! The repository cache lives outside this crate; callers hand in whatever
//! they have behind [`RepoMetadataLookup`]. Absence of metadata is never an
//! error.

use std::collections::HashMap;

use crate::policy::FALLBACK_DEFAULT_BRANCH;

/// Read-only view of cached repository metadata, keyed by `owner/repo`.
pub trait RepoMetadataLookup {
    fn default_branch(&self, full_name: &str) -> Option<String>;
}

/// Lookup that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl RepoMetadataLookup for NoMetadata {
    fn default_branch(&self, _full_name: &str) -> Option<String> {
        None
    }
}

impl RepoMetadataLookup for HashMap<String, String> {
    fn default_branch(&self, full_name: &str) -> Option<String> {
        self.get(full_name).cloned()
    }
}

/// Default branch for `full_name`: the explicit value, else the lookup's
/// answer, else `main`.
pub fn default_branch_for(
    lookup: &dyn RepoMetadataLookup,
    full_name: &str,
    explicit: Option<&str>,
) -> String {
    explicit
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
        .or_else(|| lookup.default_branch(full_name))
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string())
}
