//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use tempfile::TempDir;

/// Source tree fixture
///
/// Creates a temporary directory and lays out package directories in it.
pub struct TestTree {
    /// Temporary directory for the tree
    pub dir: TempDir,
}

impl TestTree {
    /// Create a new empty tree in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the tree root
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the tree
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the tree
    #[allow(dead_code)]
    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.dir.path().join(name)).expect("Failed to create directory");
    }

    /// Write a `package.yml` under `rel`
    pub fn package(&self, rel: &str, spec: &PackageSpec) {
        self.create_file(&format!("{rel}/package.yml"), &spec.to_yaml());
    }

    /// Mark `rel` as ignored
    #[allow(dead_code)]
    pub fn ignore(&self, rel: &str) {
        self.create_file(&format!("{rel}/autobuild.yml"), "ignore: true\n");
    }

    /// Absolute path of `rel`
    #[allow(dead_code)]
    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal `package.yml` content
pub struct PackageSpec {
    pub name: String,
    pub version: String,
    pub release: u64,
    pub builddeps: Vec<String>,
    pub provides: Vec<String>,
}

impl PackageSpec {
    pub fn new(name: &str, version: &str, release: u64) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            release,
            builddeps: Vec::new(),
            provides: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn deps(mut self, deps: &[&str]) -> Self {
        self.builddeps = deps.iter().map(ToString::to_string).collect();
        self
    }

    #[allow(dead_code)]
    pub fn provides(mut self, names: &[&str]) -> Self {
        self.provides = names.iter().map(ToString::to_string).collect();
        self
    }

    fn to_yaml(&self) -> String {
        let mut yaml = format!(
            "name       : {}\nversion    : '{}'\nrelease    : {}\n",
            self.name, self.version, self.release
        );
        for (key, values) in [("builddeps", &self.builddeps), ("provides", &self.provides)] {
            if !values.is_empty() {
                yaml.push_str(&format!("{key} :\n"));
                for value in values {
                    yaml.push_str(&format!("    - '{value}'\n"));
                }
            }
        }
        yaml
    }
}

/// Names of packages in snapshot order
#[allow(dead_code)]
pub fn names_at(packages: &[srcgraph::Package], order: &[usize]) -> Vec<String> {
    order.iter().map(|&i| packages[i].name.clone()).collect()
}
