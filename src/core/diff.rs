//! State differ
//!
//! Compares a current snapshot against a previous one to find the packages
//! an incremental rebuild has to consider.

use serde::Serialize;

use crate::core::state::State;

/// Previous side of a changed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Previous {
    /// Position in the previous snapshot
    pub index: usize,
    /// Version in the previous snapshot
    pub version: String,
    /// Release in the previous snapshot
    pub release: u64,
}

/// A new or changed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    /// Position in the current snapshot
    pub index: usize,
    /// Package name
    pub name: String,
    /// Current version
    pub version: String,
    /// Current release
    pub release: u64,
    /// Absent when the package is new
    pub previous: Option<Previous>,
}

impl Diff {
    /// True when the package did not exist in the previous snapshot
    pub fn is_new(&self) -> bool {
        self.previous.is_none()
    }

    /// Previous release, or zero for new packages
    pub fn previous_release(&self) -> u64 {
        self.previous.as_ref().map_or(0, |p| p.release)
    }
}

/// A package present only in the previous snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removed {
    /// Position in the previous snapshot
    pub previous_index: usize,
    /// Package name
    pub name: String,
}

/// New and changed packages, in current-snapshot order
///
/// Packages that only exist in `previous` are not reported; see [`removed`].
pub fn diff<C, P>(current: &C, previous: &P) -> Vec<Diff>
where
    C: State + ?Sized,
    P: State + ?Sized,
{
    let mut res = Vec::new();

    for (idx, pkg) in current.packages().iter().enumerate() {
        let Some(&old_idx) = previous.name_index().get(&pkg.name) else {
            res.push(Diff {
                index: idx,
                name: pkg.name.clone(),
                version: pkg.version.clone(),
                release: pkg.release,
                previous: None,
            });
            continue;
        };

        let old = &previous.packages()[old_idx];
        if old.release != pkg.release || old.version != pkg.version {
            res.push(Diff {
                index: idx,
                name: pkg.name.clone(),
                version: pkg.version.clone(),
                release: pkg.release,
                previous: Some(Previous {
                    index: old_idx,
                    version: old.version.clone(),
                    release: old.release,
                }),
            });
        }
    }

    res
}

/// Packages present in `previous` but not in `current`, in previous order
pub fn removed<C, P>(current: &C, previous: &P) -> Vec<Removed>
where
    C: State + ?Sized,
    P: State + ?Sized,
{
    previous
        .packages()
        .iter()
        .enumerate()
        .filter(|(_, pkg)| !current.name_index().contains_key(&pkg.name))
        .map(|(idx, pkg)| Removed {
            previous_index: idx,
            name: pkg.name.clone(),
        })
        .collect()
}
