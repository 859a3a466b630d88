//! Source snapshots
//!
//! A [`SourceState`] is the fully discovered and resolved package set of one
//! source tree. It never changes after construction; the dependency graph is
//! built on first use.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::core::diff::{self, Diff, Removed};
use crate::core::graph::DependencyGraph;
use crate::core::package::Package;
use crate::core::resolver::{self, NameIndex, UnresolvedPolicy};
use crate::error::{GraphError, ResolveError, SrcgraphError};

/// Read-only view shared by every snapshot kind
pub trait State {
    /// Packages in snapshot order
    fn packages(&self) -> &[Package];

    /// Real and provided names mapped to positions
    fn name_index(&self) -> &NameIndex;

    /// Look up a package by real or provided name
    fn lookup(&self, name: &str) -> Option<(usize, &Package)> {
        let idx = *self.name_index().get(name)?;
        self.packages().get(idx).map(|pkg| (idx, pkg))
    }
}

/// Where a snapshot came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Provenance {
    /// Inside a git work tree
    Git {
        /// HEAD commit id, if the repository has one
        head: Option<String>,
    },
    /// Plain directory tree
    Directory,
}

/// Snapshot of a package source tree
#[derive(Debug)]
pub struct SourceState {
    packages: Vec<Package>,
    name_index: NameIndex,
    graph: OnceLock<DependencyGraph>,
    provenance: Provenance,
}

impl SourceState {
    /// Build a snapshot from discovered packages
    ///
    /// Packages are sorted by name before indexing, so positions do not depend
    /// on the order discovery produced them in.
    pub fn from_packages(
        mut packages: Vec<Package>,
        provenance: Provenance,
        policy: UnresolvedPolicy,
    ) -> Result<Self, ResolveError> {
        resolver::sort_packages(&mut packages);
        let name_index = resolver::build_index(&packages)?;
        resolver::resolve(&mut packages, &name_index, policy)?;

        Ok(Self {
            packages,
            name_index,
            graph: OnceLock::new(),
            provenance,
        })
    }

    /// Dependency graph over package positions
    pub fn dependency_graph(&self) -> &DependencyGraph {
        self.graph
            .get_or_init(|| DependencyGraph::from_packages(&self.packages))
    }

    /// Provenance of the source tree
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// True if the tree lives in a git repository
    pub fn is_version_controlled(&self) -> bool {
        matches!(self.provenance, Provenance::Git { .. })
    }

    /// Get a package by real or provided name
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.lookup(name).map(|(_, pkg)| pkg)
    }

    /// Build order over the whole snapshot
    pub fn build_order(&self) -> Result<Vec<usize>, SrcgraphError> {
        self.dependency_graph()
            .topological_order()
            .map_err(|e| self.named(e))
    }

    /// New and changed packages relative to `previous`
    pub fn diff<P: State + ?Sized>(&self, previous: &P) -> Vec<Diff> {
        diff::diff(self, previous)
    }

    /// Packages of `previous` missing from this snapshot
    pub fn removed<P: State + ?Sized>(&self, previous: &P) -> Vec<Removed> {
        diff::removed(self, previous)
    }

    /// Changed packages and their transitive dependents, in build order
    pub fn rebuild_order(&self, changes: &[Diff]) -> Result<Vec<usize>, SrcgraphError> {
        let graph = self.dependency_graph();
        let affected: BTreeSet<usize> =
            graph.dependents_closure(changes.iter().map(|change| change.index));

        let order = graph.topological_order().map_err(|e| self.named(e))?;
        Ok(order.into_iter().filter(|idx| affected.contains(idx)).collect())
    }

    fn named(&self, err: GraphError) -> SrcgraphError {
        match err {
            GraphError::CyclicGraph { cycle } => SrcgraphError::CyclicGraph {
                cycle: cycle
                    .into_iter()
                    .map(|idx| self.packages[idx].name.clone())
                    .collect(),
            },
        }
    }
}

impl State for SourceState {
    fn packages(&self) -> &[Package] {
        &self.packages
    }

    fn name_index(&self) -> &NameIndex {
        &self.name_index
    }
}
