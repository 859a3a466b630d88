//! Package record
//!
//! A package is produced by a descriptor parser during discovery and is
//! immutable once its dependencies have been resolved against a snapshot.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A buildable package found in the source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    /// Package name, unique within a snapshot
    pub name: String,

    /// Package version (opaque, never compared for ordering)
    pub version: String,

    /// Build counter distinguishing rebuilds of the same version
    pub release: u64,

    /// Raw dependency names (real or provided)
    pub dependencies: BTreeSet<String>,

    /// Virtual names this package satisfies
    pub provides: BTreeSet<String>,

    /// Directory containing the package descriptor
    pub path: PathBuf,

    /// Positions of the packages this one depends on
    resolved: BTreeSet<usize>,

    /// Dependency names with no owner in the snapshot
    unresolved: BTreeSet<String>,
}

impl Package {
    /// Create a package with no dependencies or provided names
    pub fn new(name: impl Into<String>, version: impl Into<String>, release: u64) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            release,
            dependencies: BTreeSet::new(),
            provides: BTreeSet::new(),
            path: PathBuf::new(),
            resolved: BTreeSet::new(),
            unresolved: BTreeSet::new(),
        }
    }

    /// Set the raw dependency names
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Set the provided virtual names
    #[must_use]
    pub fn with_provides<I, S>(mut self, provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provides = provides.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source directory
    #[must_use]
    pub fn at(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// The real name followed by every provided name
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.provides.iter().map(String::as_str))
    }

    /// Positions of resolved dependencies
    pub fn resolved(&self) -> &BTreeSet<usize> {
        &self.resolved
    }

    /// Dependency names that could not be resolved
    pub fn unresolved(&self) -> &BTreeSet<String> {
        &self.unresolved
    }

    /// A package is buildable when all of its dependencies resolved
    pub fn is_buildable(&self) -> bool {
        self.unresolved.is_empty()
    }

    pub(crate) fn set_resolution(&mut self, resolved: BTreeSet<usize>, unresolved: BTreeSet<String>) {
        self.resolved = resolved;
        self.unresolved = unresolved;
    }
}
