//! Package discovery
//!
//! Walks a source tree on a pool of worker threads. Each directory visit is
//! independent; found packages are sent over a channel to a single collector
//! thread, so the walkers share no mutable state.
//!
//! A directory visit is decided in this order:
//!
//! 1. deny-listed basename: skipped, nothing below it is looked at
//! 2. ignore config with `ignore: true`: subtree pruned
//! 3. descriptor present: parsed, subtree not descended (packages don't nest)
//! 4. otherwise: every child directory is visited; symlinks are not followed

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;

use crate::config::settings::DiscoveryConfig;
use crate::core::package::Package;
use crate::core::state::SourceState;
use crate::error::{DiscoveryError, SrcgraphError};
use crate::infra::descriptor::{
    IgnoreConfigLoader, PackageParser, YamlIgnoreLoader, YamlPackageParser,
};
use crate::infra::git;

type Found = Result<Package, DiscoveryError>;

/// Outcome of visiting one directory
#[derive(Debug)]
enum Visit {
    Skip,
    Package(Package),
    Descend(Vec<PathBuf>),
}

/// Concurrent package discovery over a directory tree
pub struct Discovery {
    config: DiscoveryConfig,
    parsers: Vec<Box<dyn PackageParser>>,
    ignore_loader: Box<dyn IgnoreConfigLoader>,
}

impl Discovery {
    /// Discovery with the YAML descriptor formats named in `config`
    pub fn new(config: DiscoveryConfig) -> Self {
        let parsers: Vec<Box<dyn PackageParser>> =
            vec![Box::new(YamlPackageParser::new(config.descriptor_file.clone()))];
        Self {
            config,
            parsers,
            ignore_loader: Box::new(YamlIgnoreLoader),
        }
    }

    /// Replace the descriptor formats; they are probed in order
    #[must_use]
    pub fn with_parsers(mut self, parsers: Vec<Box<dyn PackageParser>>) -> Self {
        self.parsers = parsers;
        self
    }

    /// Add a descriptor format probed after the existing ones
    #[must_use]
    pub fn with_parser(mut self, parser: impl PackageParser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// Replace the ignore config loader
    #[must_use]
    pub fn with_ignore_loader(mut self, loader: impl IgnoreConfigLoader + 'static) -> Self {
        self.ignore_loader = Box::new(loader);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Find every package below `root`
    ///
    /// The returned order depends on thread scheduling. The first error from
    /// any visit aborts the walk and no packages are returned.
    pub fn discover(&self, root: &Path) -> Result<Vec<Package>, DiscoveryError> {
        if !root.is_dir() {
            return Err(DiscoveryError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let jobs = self.config.jobs();
        tracing::info!("Scanning {} with {} walkers", root.display(), jobs);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("srcgraph-walk-{i}"))
            .build()
            .map_err(|e| DiscoveryError::ThreadPool {
                error: e.to_string(),
            })?;

        let (tx, rx) = mpsc::channel::<Found>();
        let collector = thread::Builder::new()
            .name("srcgraph-collect".to_string())
            .spawn(move || collect(rx))
            .map_err(|e| DiscoveryError::ThreadPool {
                error: e.to_string(),
            })?;

        let aborted = AtomicBool::new(false);
        pool.scope(|scope| self.visit(scope, root.to_path_buf(), tx, &aborted));

        // Every sender is dropped once the scope returns, which ends the
        // collector's receive loop.
        let packages = collector.join().map_err(|_| DiscoveryError::ThreadPool {
            error: "collector thread panicked".to_string(),
        })??;

        tracing::info!("Found {} packages in {}", packages.len(), root.display());
        Ok(packages)
    }

    fn visit<'s>(
        &'s self,
        scope: &rayon::Scope<'s>,
        dir: PathBuf,
        tx: Sender<Found>,
        aborted: &'s AtomicBool,
    ) {
        if aborted.load(Ordering::Relaxed) {
            return;
        }

        match self.classify(&dir) {
            Ok(Visit::Skip) => {}
            Ok(Visit::Package(pkg)) => {
                tracing::debug!("Found package {} at {}", pkg.name, dir.display());
                // The collector outlives every walker.
                let _ = tx.send(Ok(pkg));
            }
            Ok(Visit::Descend(children)) => {
                for child in children {
                    let tx = tx.clone();
                    scope.spawn(move |scope| self.visit(scope, child, tx, aborted));
                }
            }
            Err(e) => {
                aborted.store(true, Ordering::Relaxed);
                let _ = tx.send(Err(e));
            }
        }
    }

    fn classify(&self, dir: &Path) -> Result<Visit, DiscoveryError> {
        if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
            if self.config.is_denied(name) {
                tracing::debug!("Skipping deny-listed directory {}", dir.display());
                return Ok(Visit::Skip);
            }
        }

        let ignore_file = dir.join(&self.config.ignore_file);
        if ignore_file.is_file() {
            let ignore = self
                .ignore_loader
                .load(&ignore_file)
                .map_err(|source| DiscoveryError::Config {
                    path: ignore_file.clone(),
                    source,
                })?;
            if ignore.ignore {
                tracing::debug!("Pruning ignored directory {}", dir.display());
                return Ok(Visit::Skip);
            }
        }

        for parser in &self.parsers {
            if dir.join(parser.descriptor_file()).is_file() {
                let pkg = parser
                    .parse(dir)
                    .map_err(|source| DiscoveryError::Descriptor {
                        dir: dir.to_path_buf(),
                        source,
                    })?;
                return Ok(Visit::Package(pkg));
            }
        }

        let io_error = |e: std::io::Error| DiscoveryError::Io {
            path: dir.to_path_buf(),
            error: e.to_string(),
        };
        let mut children = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            // DirEntry::file_type does not traverse symlinks.
            if entry.file_type().map_err(io_error)?.is_dir() {
                children.push(entry.path());
            }
        }
        Ok(Visit::Descend(children))
    }
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("config", &self.config)
            .field(
                "formats",
                &self
                    .parsers
                    .iter()
                    .map(|p| p.descriptor_file())
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Drain the channel, keeping the first error
fn collect(rx: mpsc::Receiver<Found>) -> Result<Vec<Package>, DiscoveryError> {
    let mut packages = Vec::new();
    let mut failure = None;

    for found in rx {
        match found {
            Ok(pkg) => packages.push(pkg),
            Err(e) if failure.is_none() => failure = Some(e),
            Err(e) => tracing::debug!("Discarding follow-up discovery error: {}", e),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(packages),
    }
}

/// Discover, resolve and index the source tree at `root`
pub fn load_source(root: &Path, config: &DiscoveryConfig) -> Result<SourceState, SrcgraphError> {
    let packages = Discovery::new(config.clone()).discover(root)?;
    let provenance = git::detect_provenance(root);
    let state = SourceState::from_packages(packages, provenance, config.unresolved_policy())?;
    Ok(state)
}
