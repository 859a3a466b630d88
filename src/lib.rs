//! Srcgraph - source-state engine for distribution package builds
//!
//! This library discovers package descriptors in a source tree, resolves
//! their dependencies (including provided virtual names) into a dependency
//! graph, and computes which packages changed between two snapshots.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Snapshot model and algorithms (no I/O operations)
//! - [`infra`] - Infrastructure layer (directory walk, descriptors, git)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;

pub use crate::config::settings::DiscoveryConfig;
pub use crate::core::diff::{Diff, Removed};
pub use crate::core::package::Package;
pub use crate::core::state::{Provenance, SourceState, State};
pub use crate::infra::discovery::{load_source, Discovery};
