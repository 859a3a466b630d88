//! Error types for srcgraph
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Package descriptor and ignore-config errors
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Failed to read a descriptor file
    #[error("Failed to read '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Descriptor content is malformed
    #[error("Failed to parse '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// Missing required field
    #[error("Descriptor '{path}' is missing required field '{field}'")]
    MissingField { path: PathBuf, field: String },
}

/// Discovery errors
///
/// Any of these aborts the whole scan.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// Package descriptor could not be parsed
    #[error("Failed to load package in '{dir}': {source}")]
    Descriptor {
        dir: PathBuf,
        #[source]
        source: DescriptorError,
    },

    /// Ignore configuration could not be loaded
    #[error("Failed to load ignore config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: DescriptorError,
    },

    /// Directory could not be listed
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Root is not a directory
    #[error("Source root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Walker pool could not be started
    #[error("Failed to start walker pool: {error}")]
    ThreadPool { error: String },
}

/// Name resolution errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// Two packages claim the same real or provided name
    #[error("Name '{name}' is claimed by both '{first}' and '{second}'")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Dependency has no owner in the snapshot
    #[error("Unresolved dependency: '{dependency}' required by '{package}'")]
    UnresolvedDependency { package: String, dependency: String },
}

/// Dependency graph errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// Topological order requested on a cyclic graph
    #[error("Circular dependency detected between positions {cycle:?}")]
    CyclicGraph { cycle: Vec<usize> },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },
}

/// Top-level srcgraph error type
#[derive(Error, Debug)]
pub enum SrcgraphError {
    /// Discovery error
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Resolve error
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Cyclic graph, rendered with package names
    #[error("Circular dependency detected: {}", cycle.join(" -> "))]
    CyclicGraph { cycle: Vec<String> },

    /// Config error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
