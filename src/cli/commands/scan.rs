//! Scan command implementation
//!
//! Implements `srcgraph scan` to list the packages of a source tree.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::{load, DiscoveryArgs};
use crate::cli::output::Output;
use crate::core::package::Package;
use crate::core::state::{Provenance, State};

#[derive(Serialize)]
struct ScanReport<'a> {
    provenance: &'a Provenance,
    packages: &'a [Package],
}

/// Execute the scan command
pub async fn execute(root: PathBuf, discovery: DiscoveryArgs, output: &Output) -> Result<()> {
    let state = load(root, discovery).await?;

    if output.is_json() {
        return output.json(&ScanReport {
            provenance: state.provenance(),
            packages: state.packages(),
        });
    }

    let mut unbuildable = 0;
    for pkg in state.packages() {
        let mut line = format!(
            "{} {}-{} {}",
            pkg.name,
            pkg.version,
            pkg.release,
            pkg.path.display()
        );
        if !pkg.is_buildable() {
            unbuildable += 1;
            let missing: Vec<&str> = pkg.unresolved().iter().map(String::as_str).collect();
            line.push_str(&format!(" (unresolved: {})", missing.join(", ")));
        }
        output.line(line);
    }

    output.success(format!("{} packages", state.packages().len()));
    if unbuildable > 0 {
        output.warning(format!("{unbuildable} packages have unresolved dependencies"));
    }
    Ok(())
}
