//! Configuration and constants
//!
//! - [`defaults`] - Default file names and values
//! - [`settings`] - Discovery configuration loaded from `srcgraph.toml`

pub mod defaults;
pub mod settings;
