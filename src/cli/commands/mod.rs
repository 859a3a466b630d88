//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod diff;
pub mod order;
pub mod rebuild;
pub mod scan;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use crate::cli::output::Output;
use crate::config::settings::DiscoveryConfig;
use crate::core::state::SourceState;
use crate::infra::discovery::load_source;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover and list the packages of a source tree
    Scan {
        /// Root of the source tree
        root: PathBuf,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },

    /// Print the build order of a source tree
    Order {
        /// Root of the source tree
        root: PathBuf,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },

    /// Show new and changed packages between two source trees
    Diff {
        /// Previous source tree
        previous: PathBuf,

        /// Current source tree
        current: PathBuf,

        /// Also report packages missing from the current tree
        #[arg(long)]
        removed: bool,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },

    /// Print the packages to rebuild, in build order
    Rebuild {
        /// Previous source tree
        previous: PathBuf,

        /// Current source tree
        current: PathBuf,

        #[command(flatten)]
        discovery: DiscoveryArgs,
    },
}

/// Discovery overrides shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct DiscoveryArgs {
    /// Number of walker threads
    #[arg(short, long, env = "SRCGRAPH_JOBS")]
    pub jobs: Option<usize>,

    /// Extra directory name to skip (repeatable)
    #[arg(long = "deny", value_name = "NAME")]
    pub deny: Vec<String>,

    /// Fail on dependencies that no package provides
    #[arg(long)]
    pub strict: bool,
}

impl DiscoveryArgs {
    /// Settings from `srcgraph.toml` in `root` with these flags applied
    pub fn config_for(&self, root: &Path) -> Result<DiscoveryConfig> {
        let mut config = DiscoveryConfig::load_or_default(root)?;
        if self.jobs.is_some() {
            config.jobs = self.jobs;
        }
        config.deny_list.extend(self.deny.iter().cloned());
        config.strict_dependencies |= self.strict;
        Ok(config)
    }
}

/// Load a snapshot off the async runtime
pub(crate) async fn load(root: PathBuf, args: DiscoveryArgs) -> Result<SourceState> {
    tokio::task::spawn_blocking(move || {
        let config = args.config_for(&root)?;
        load_source(&root, &config)
            .with_context(|| format!("Failed to load source tree {}", root.display()))
    })
    .await?
}

impl Commands {
    /// Execute the command
    pub async fn run(self, output: &Output) -> Result<()> {
        match self {
            Self::Scan { root, discovery } => scan::execute(root, discovery, output).await,
            Self::Order { root, discovery } => order::execute(root, discovery, output).await,
            Self::Diff {
                previous,
                current,
                removed,
                discovery,
            } => diff::execute(previous, current, removed, discovery, output).await,
            Self::Rebuild {
                previous,
                current,
                discovery,
            } => rebuild::execute(previous, current, discovery, output).await,
        }
    }
}
