//! Dependency graph
//!
//! Directed graph over package positions. An edge runs from a dependent to
//! one of its dependencies; build order puts dependencies first.

use std::cmp::Reverse;
use std::collections::{btree_set, BTreeSet, BinaryHeap, VecDeque};

use crate::core::package::Package;
use crate::error::GraphError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Dependency graph keyed by package position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    /// Adjacency list: position -> dependencies
    dependencies: Vec<BTreeSet<usize>>,
    /// Reverse adjacency: position -> dependents
    dependents: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    /// Create a graph with `vertices` vertices and no edges
    pub fn new(vertices: usize) -> Self {
        Self {
            dependencies: vec![BTreeSet::new(); vertices],
            dependents: vec![BTreeSet::new(); vertices],
        }
    }

    /// Build the graph from resolved packages
    pub fn from_packages(packages: &[Package]) -> Self {
        let mut graph = Self::new(packages.len());
        for (idx, pkg) in packages.iter().enumerate() {
            for &dep in pkg.resolved() {
                graph.add_edge(idx, dep);
            }
        }
        graph
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.dependencies.iter().map(BTreeSet::len).sum()
    }

    /// Record that `dependent` depends on `dependency`
    ///
    /// Returns `false` if the edge was already present. Both positions must
    /// be in range.
    pub fn add_edge(&mut self, dependent: usize, dependency: usize) -> bool {
        let added = self.dependencies[dependent].insert(dependency);
        self.dependents[dependency].insert(dependent);
        added
    }

    /// Direct dependencies of `vertex`
    pub fn dependencies(&self, vertex: usize) -> &BTreeSet<usize> {
        &self.dependencies[vertex]
    }

    /// Direct dependents of `vertex`
    pub fn dependents(&self, vertex: usize) -> &BTreeSet<usize> {
        &self.dependents[vertex]
    }

    /// Check if the graph has any cycles
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Find one cycle, if any
    ///
    /// The cycle is returned closed: its first and last elements are the same
    /// vertex. Vertices and edges are explored in ascending order, so the
    /// reported cycle is stable for a fixed graph.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        let mut marks = vec![Mark::White; self.vertex_count()];

        for start in 0..self.vertex_count() {
            if marks[start] != Mark::White {
                continue;
            }

            let mut stack: Vec<(usize, btree_set::Iter<'_, usize>)> =
                vec![(start, self.dependencies[start].iter())];
            marks[start] = Mark::Gray;

            while let Some((vertex, deps)) = stack.last_mut() {
                let vertex = *vertex;
                match deps.next().copied() {
                    Some(next) => match marks[next] {
                        Mark::White => {
                            marks[next] = Mark::Gray;
                            stack.push((next, self.dependencies[next].iter()));
                        }
                        Mark::Gray => {
                            // Gray vertices are exactly those on the stack.
                            let from = stack.iter().position(|(v, _)| *v == next)?;
                            let mut cycle: Vec<usize> =
                                stack[from..].iter().map(|(v, _)| *v).collect();
                            cycle.push(next);
                            return Some(cycle);
                        }
                        Mark::Black => {}
                    },
                    None => {
                        marks[vertex] = Mark::Black;
                        stack.pop();
                    }
                }
            }
        }

        None
    }

    /// Compute topological sort (build order)
    ///
    /// Returns positions in order such that dependencies come before
    /// dependents. Among vertices that are ready at the same time, the lowest
    /// position goes first.
    pub fn topological_order(&self) -> Result<Vec<usize>, GraphError> {
        if let Some(cycle) = self.find_cycle() {
            return Err(GraphError::CyclicGraph { cycle });
        }

        let mut pending: Vec<usize> = self.dependencies.iter().map(BTreeSet::len).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = pending
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(idx, _)| Reverse(idx))
            .collect();
        let mut order = Vec::with_capacity(self.vertex_count());

        while let Some(Reverse(vertex)) = ready.pop() {
            order.push(vertex);
            for &dependent in &self.dependents[vertex] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        Ok(order)
    }

    /// `seeds` plus every vertex that transitively depends on one of them
    pub fn dependents_closure(&self, seeds: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<usize> = seeds.into_iter().collect();

        while let Some(vertex) = queue.pop_front() {
            if seen.insert(vertex) {
                queue.extend(self.dependents[vertex].iter().copied());
            }
        }

        seen
    }
}
