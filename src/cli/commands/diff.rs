//! Diff command implementation
//!
//! Implements `srcgraph diff` to compare two source trees.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::{load, DiscoveryArgs};
use crate::cli::output::Output;
use crate::core::diff::{Diff, Removed};

#[derive(Serialize)]
struct DiffReport {
    changed: Vec<Diff>,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed: Option<Vec<Removed>>,
}

/// Execute the diff command
pub async fn execute(
    previous: PathBuf,
    current: PathBuf,
    with_removed: bool,
    discovery: DiscoveryArgs,
    output: &Output,
) -> Result<()> {
    let (previous, current) = tokio::try_join!(
        load(previous, discovery.clone()),
        load(current, discovery)
    )?;

    let report = DiffReport {
        changed: current.diff(&previous),
        removed: with_removed.then(|| current.removed(&previous)),
    };

    if output.is_json() {
        return output.json(&report);
    }

    for entry in &report.changed {
        match &entry.previous {
            None => output.line(format!("+ {} {}-{}", entry.name, entry.version, entry.release)),
            Some(old) => output.line(format!(
                "~ {} {}-{} -> {}-{}",
                entry.name, old.version, old.release, entry.version, entry.release
            )),
        }
    }
    for gone in report.removed.iter().flatten() {
        output.line(format!("- {}", gone.name));
    }

    output.success(format!("{} new or changed packages", report.changed.len()));
    Ok(())
}
