//! Rebuild command implementation
//!
//! Implements `srcgraph rebuild` to list what an incremental build has to
//! rebuild: changed packages and everything depending on them.

use anyhow::Result;
use std::path::PathBuf;

use crate::cli::commands::{load, DiscoveryArgs};
use crate::cli::output::Output;
use crate::core::state::State;

/// Execute the rebuild command
pub async fn execute(
    previous: PathBuf,
    current: PathBuf,
    discovery: DiscoveryArgs,
    output: &Output,
) -> Result<()> {
    let (previous, current) = tokio::try_join!(
        load(previous, discovery.clone()),
        load(current, discovery)
    )?;

    let changes = current.diff(&previous);
    let order = current.rebuild_order(&changes)?;
    let names: Vec<&str> = order
        .iter()
        .map(|&idx| current.packages()[idx].name.as_str())
        .collect();

    if output.is_json() {
        return output.json(&names);
    }

    for name in &names {
        output.line(name);
    }
    output.success(format!(
        "{} packages to rebuild ({} changed)",
        names.len(),
        changes.len()
    ));
    Ok(())
}
