//! Git provenance
//!
//! Detects whether a source tree lives in a git repository using the gix
//! crate.

use std::path::Path;

use crate::core::state::Provenance;

/// Classify `root` as a git work tree or a plain directory
///
/// The repository may be rooted at `root` or at any parent directory.
pub fn detect_provenance(root: &Path) -> Provenance {
    match gix::discover(root) {
        Ok(repo) => {
            let head = repo.head_id().ok().map(|id| id.to_hex().to_string());
            tracing::debug!(
                "Source tree {} is version controlled (HEAD {})",
                root.display(),
                head.as_deref().unwrap_or("unborn")
            );
            Provenance::Git { head }
        }
        Err(e) => {
            tracing::debug!("No git repository at {}: {}", root.display(), e);
            Provenance::Directory
        }
    }
}
