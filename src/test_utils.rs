//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    use crate::core::package::Package;

    /// Generate a valid package name (lowercase alphanumeric with hyphens)
    pub fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,30}[a-z0-9]?".prop_filter("Name must not be empty", |s| !s.is_empty())
    }

    /// Generate a version string (opaque to srcgraph)
    pub fn version() -> impl Strategy<Value = String> {
        (0u32..30, 0u32..100).prop_map(|(major, minor)| format!("{major}.{minor}"))
    }

    /// Generate packages with distinct names, each providing `pkgconfig(<name>)`
    pub fn packages() -> impl Strategy<Value = Vec<Package>> {
        proptest::collection::btree_map(package_name(), (version(), 1u64..50), 1..25).prop_map(
            |entries| {
                entries
                    .into_iter()
                    .map(|(name, (version, release))| {
                        let virt = format!("pkgconfig({name})");
                        Package::new(name, version, release).with_provides([virt])
                    })
                    .collect()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_package_name_generator(name in package_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn test_packages_generator_has_unique_names(packages in packages()) {
            let mut names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
            names.dedup();
            prop_assert_eq!(names.len(), packages.len());
        }
    }
}
