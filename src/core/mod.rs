//! Core business logic module
//!
//! This module contains the snapshot model and its algorithms.
//! It has NO I/O operations - those belong in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`package`] - Package record
//! - [`resolver`] - Name indexing and dependency resolution
//! - [`graph`] - Dependency graph, cycle detection and build order
//! - [`diff`] - Snapshot comparison
//! - [`state`] - Snapshot types

pub mod diff;
pub mod graph;
pub mod package;
pub mod resolver;
pub mod state;
