//! Discovery configuration
//!
//! Reads settings from `srcgraph.toml` at the root of a source tree. Every
//! field is optional; a missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::defaults;
use crate::core::resolver::UnresolvedPolicy;
use crate::error::ConfigError;

/// Settings for a discovery run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directory basenames that are skipped without looking inside
    pub deny_list: Vec<String>,

    /// Number of walker threads (defaults to the CPU count)
    pub jobs: Option<usize>,

    /// Package descriptor file name
    pub descriptor_file: String,

    /// Ignore configuration file name
    pub ignore_file: String,

    /// Reject snapshots with unresolved dependencies
    pub strict_dependencies: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            deny_list: defaults::DENY_LIST.iter().map(ToString::to_string).collect(),
            jobs: None,
            descriptor_file: defaults::DESCRIPTOR_FILE.to_string(),
            ignore_file: defaults::IGNORE_FILE.to_string(),
            strict_dependencies: false,
        }
    }
}

impl DiscoveryConfig {
    /// Load configuration from a specific path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load `srcgraph.toml` from `root`, or the defaults if it doesn't exist
    pub fn load_or_default(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(defaults::CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        tracing::debug!("Loading discovery config from {}", path.display());
        Self::load(&path)
    }

    /// Effective walker thread count
    pub fn jobs(&self) -> usize {
        self.jobs.filter(|&n| n > 0).unwrap_or_else(num_cpus::get)
    }

    /// Check if a directory basename is deny-listed
    pub fn is_denied(&self, name: &str) -> bool {
        self.deny_list.iter().any(|denied| denied == name)
    }

    /// Policy for unresolved dependency names
    pub fn unresolved_policy(&self) -> UnresolvedPolicy {
        UnresolvedPolicy::from_strict(self.strict_dependencies)
    }
}
