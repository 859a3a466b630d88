//! Default configuration values

/// Package descriptor file name
pub const DESCRIPTOR_FILE: &str = "package.yml";

/// Per-directory ignore configuration file name
pub const IGNORE_FILE: &str = "autobuild.yml";

/// Optional discovery configuration at the tree root
pub const CONFIG_FILE: &str = "srcgraph.toml";

/// Directories never walked: VCS metadata and packages known to break discovery
pub const DENY_LIST: &[&str] = &[".git", "haskell-http-client-tls"];
