//! Order command implementation
//!
//! Implements `srcgraph order` to print a source tree's build order.

use anyhow::Result;
use std::path::PathBuf;

use crate::cli::commands::{load, DiscoveryArgs};
use crate::cli::output::Output;
use crate::core::state::State;

/// Execute the order command
pub async fn execute(root: PathBuf, discovery: DiscoveryArgs, output: &Output) -> Result<()> {
    let state = load(root, discovery).await?;
    let order = state.build_order()?;
    let names: Vec<&str> = order
        .iter()
        .map(|&idx| state.packages()[idx].name.as_str())
        .collect();

    if output.is_json() {
        return output.json(&names);
    }

    for name in &names {
        output.line(name);
    }
    output.success(format!("{} packages in build order", names.len()));
    Ok(())
}
