//! Name resolution
//!
//! Maps every real and provided name to the position of its owning package,
//! then translates raw dependency names into positions.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::package::Package;
use crate::error::ResolveError;

/// Mapping from real or provided name to package position
pub type NameIndex = BTreeMap<String, usize>;

/// What to do with a dependency name that has no owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Record the name on the package and mark it unbuildable
    #[default]
    Lenient,
    /// Reject the whole snapshot
    Strict,
}

impl UnresolvedPolicy {
    /// Policy for a `strict_dependencies` setting
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Sort packages into their canonical snapshot order (name, then path)
pub fn sort_packages(packages: &mut [Package]) {
    packages.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
}

/// Pass 1: register every real and provided name
///
/// A package may list its own name under `provides`; any other repeat is a
/// collision.
pub fn build_index(packages: &[Package]) -> Result<NameIndex, ResolveError> {
    let mut index = NameIndex::new();

    for (idx, pkg) in packages.iter().enumerate() {
        for name in pkg.names() {
            match index.get(name) {
                Some(&owner) if owner != idx => {
                    return Err(ResolveError::NameCollision {
                        name: name.to_string(),
                        first: packages[owner].name.clone(),
                        second: pkg.name.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    index.insert(name.to_string(), idx);
                }
            }
        }
    }

    Ok(index)
}

/// Pass 2: resolve every package's dependency names against `index`
///
/// Dependencies that point back at the package itself are dropped.
pub fn resolve(
    packages: &mut [Package],
    index: &NameIndex,
    policy: UnresolvedPolicy,
) -> Result<(), ResolveError> {
    for (idx, pkg) in packages.iter_mut().enumerate() {
        let mut resolved = BTreeSet::new();
        let mut unresolved = BTreeSet::new();

        for dep in &pkg.dependencies {
            match index.get(dep) {
                Some(&target) if target == idx => {
                    tracing::debug!("Dropping self-dependency '{}' of {}", dep, pkg.name);
                }
                Some(&target) => {
                    resolved.insert(target);
                }
                None if policy == UnresolvedPolicy::Strict => {
                    return Err(ResolveError::UnresolvedDependency {
                        package: pkg.name.clone(),
                        dependency: dep.clone(),
                    });
                }
                None => {
                    tracing::warn!("Package {} depends on unknown name '{}'", pkg.name, dep);
                    unresolved.insert(dep.clone());
                }
            }
        }

        pkg.set_resolution(resolved, unresolved);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::generators;
    use proptest::prelude::*;

    fn sample() -> Vec<Package> {
        vec![
            Package::new("glibc", "2.38", 10).with_provides(["libc.so.6"]),
            Package::new("zlib", "1.3", 3).with_dependencies(["libc.so.6"]),
            Package::new("curl", "8.5.0", 12).with_dependencies(["zlib", "glibc", "openssl"]),
        ]
    }

    #[test]
    fn test_index_covers_real_and_virtual_names() {
        let packages = sample();
        let index = build_index(&packages).unwrap();
        assert_eq!(index["glibc"], 0);
        assert_eq!(index["libc.so.6"], 0);
        assert_eq!(index["zlib"], 1);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_collision_between_real_and_virtual_name() {
        let packages = vec![
            Package::new("musl", "1.2", 1).with_provides(["libc"]),
            Package::new("libc", "2.38", 1),
        ];
        let err = build_index(&packages).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NameCollision {
                name: "libc".to_string(),
                first: "musl".to_string(),
                second: "libc".to_string(),
            }
        );
    }

    #[test]
    fn test_collision_between_two_providers() {
        let packages = vec![
            Package::new("openssl", "3.1", 1).with_provides(["libssl"]),
            Package::new("libressl", "3.8", 1).with_provides(["libssl"]),
        ];
        assert!(matches!(
            build_index(&packages),
            Err(ResolveError::NameCollision { ref name, .. }) if name == "libssl"
        ));
    }

    #[test]
    fn test_self_provide_is_not_a_collision() {
        let packages = vec![Package::new("perl", "5.38", 1).with_provides(["perl"])];
        assert!(build_index(&packages).is_ok());
    }

    #[test]
    fn test_lenient_resolution_records_unknown_names() {
        let mut packages = sample();
        let index = build_index(&packages).unwrap();
        resolve(&mut packages, &index, UnresolvedPolicy::Lenient).unwrap();

        assert_eq!(packages[1].resolved(), &BTreeSet::from([0]));
        assert_eq!(packages[2].resolved(), &BTreeSet::from([0, 1]));
        assert!(packages[2].unresolved().contains("openssl"));
        assert!(!packages[2].is_buildable());
        assert!(packages[1].is_buildable());
    }

    #[test]
    fn test_strict_resolution_rejects_unknown_names() {
        let mut packages = sample();
        let index = build_index(&packages).unwrap();
        let err = resolve(&mut packages, &index, UnresolvedPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnresolvedDependency {
                package: "curl".to_string(),
                dependency: "openssl".to_string(),
            }
        );
    }

    #[test]
    fn test_self_dependency_is_dropped() {
        let mut packages = vec![Package::new("gtk3", "3.24", 2)
            .with_provides(["pkgconfig(gtk+-3.0)"])
            .with_dependencies(["pkgconfig(gtk+-3.0)"])];
        let index = build_index(&packages).unwrap();
        resolve(&mut packages, &index, UnresolvedPolicy::Strict).unwrap();
        assert!(packages[0].resolved().is_empty());
        assert!(packages[0].is_buildable());
    }

    #[test]
    fn test_sort_orders_by_name() {
        let mut packages = sample();
        sort_packages(&mut packages);
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["curl", "glibc", "zlib"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_index_points_every_name_at_its_owner(packages in generators::packages()) {
            let index = build_index(&packages).unwrap();

            for (idx, pkg) in packages.iter().enumerate() {
                prop_assert_eq!(index[&pkg.name], idx);
                for virt in &pkg.provides {
                    prop_assert_eq!(index[virt], idx);
                }
            }
        }
    }
}
