//! Integration tests for package discovery
//!
//! - Discovery is set-equivalent across runs and thread counts
//! - Deny-listed and ignored directories never contribute packages
//! - Package directories are never descended into
//! - Any descriptor error aborts the whole scan

mod common;

use common::{PackageSpec, TestTree};
use srcgraph::error::{DiscoveryError, ResolveError, SrcgraphError};
use srcgraph::{load_source, Discovery, DiscoveryConfig, State};
use std::collections::BTreeSet;

fn sample_tree() -> TestTree {
    let tree = TestTree::new();
    tree.package("a/attr", &PackageSpec::new("attr", "2.5.1", 4));
    tree.package("b/bash", &PackageSpec::new("bash", "5.2", 9).deps(&["readline"]));
    tree.package(
        "r/readline",
        &PackageSpec::new("readline", "8.2", 6).provides(&["pkgconfig(readline)"]),
    );
    tree.package("n/ncurses", &PackageSpec::new("ncurses", "6.4", 3));
    tree.package("x/xorg/lib/libx11", &PackageSpec::new("libx11", "1.8", 2));
    tree
}

fn discovered(tree: &TestTree, jobs: usize) -> BTreeSet<(String, std::path::PathBuf)> {
    let config = DiscoveryConfig {
        jobs: Some(jobs),
        ..DiscoveryConfig::default()
    };
    Discovery::new(config)
        .discover(&tree.path())
        .expect("discovery failed")
        .into_iter()
        .map(|p| (p.name, p.path))
        .collect()
}

#[test]
fn test_discovery_is_set_equivalent_across_runs() {
    let tree = sample_tree();
    let first = discovered(&tree, 8);
    for jobs in [1, 2, 8] {
        assert_eq!(discovered(&tree, jobs), first);
    }
    assert_eq!(first.len(), 5);
}

#[test]
fn test_positions_are_stable_across_runs() {
    let tree = sample_tree();
    let config = DiscoveryConfig::default();
    let first = load_source(&tree.path(), &config).unwrap();
    let second = load_source(&tree.path(), &config).unwrap();

    assert_eq!(first.packages(), second.packages());
    assert_eq!(first.name_index(), second.name_index());
}

#[test]
fn test_name_index_covers_provides() {
    let tree = sample_tree();
    let state = load_source(&tree.path(), &DiscoveryConfig::default()).unwrap();

    for (idx, pkg) in state.packages().iter().enumerate() {
        assert_eq!(state.name_index()[&pkg.name], idx);
        for name in &pkg.provides {
            assert_eq!(state.name_index()[name], idx);
        }
    }
    assert_eq!(
        state.get("pkgconfig(readline)").map(|p| p.name.as_str()),
        Some("readline")
    );
}

#[test]
fn test_deny_list_from_config_file() {
    let tree = sample_tree();
    tree.create_file("srcgraph.toml", "deny_list = [\"ncurses\", \"xorg\"]\n");

    let config = DiscoveryConfig::load_or_default(&tree.path()).unwrap();
    let state = load_source(&tree.path(), &config).unwrap();
    let names: Vec<&str> = state.packages().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["attr", "bash", "readline"]);
}

#[test]
fn test_ignored_directory_and_descendants_are_pruned() {
    let tree = sample_tree();
    tree.ignore("x");

    let found = discovered(&tree, 4);
    assert!(found.iter().all(|(name, _)| name != "libx11"));
    assert_eq!(found.len(), 4);
}

#[test]
fn test_nested_descriptor_is_not_discovered() {
    let tree = sample_tree();
    tree.package("b/bash/tests/fixture", &PackageSpec::new("fixture", "0", 1));

    let found = discovered(&tree, 4);
    assert!(found.iter().all(|(name, _)| name != "fixture"));
}

#[test]
fn test_parse_error_discards_everything() {
    let tree = sample_tree();
    tree.create_file("broken/package.yml", "name: broken\nversion: [\n");

    let err = load_source(&tree.path(), &DiscoveryConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        SrcgraphError::Discovery(DiscoveryError::Descriptor { .. })
    ));
}

#[test]
fn test_duplicate_names_are_rejected() {
    let tree = sample_tree();
    tree.package("dup/attr", &PackageSpec::new("attr", "2.5.2", 5));

    let err = load_source(&tree.path(), &DiscoveryConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        SrcgraphError::Resolve(ResolveError::NameCollision { ref name, .. }) if name == "attr"
    ));
}

#[test]
fn test_unresolved_dependency_policies() {
    let tree = sample_tree();
    tree.package("v/vim", &PackageSpec::new("vim", "9.0", 1).deps(&["ncurses", "gpm"]));

    let lenient = load_source(&tree.path(), &DiscoveryConfig::default()).unwrap();
    let vim = lenient.get("vim").unwrap();
    assert!(!vim.is_buildable());
    assert!(vim.unresolved().contains("gpm"));

    let strict = DiscoveryConfig {
        strict_dependencies: true,
        ..DiscoveryConfig::default()
    };
    let err = load_source(&tree.path(), &strict).unwrap_err();
    assert!(matches!(
        err,
        SrcgraphError::Resolve(ResolveError::UnresolvedDependency { ref dependency, .. })
            if dependency == "gpm"
    ));
}
