//! Output formatting
//!
//! Commands print either human-readable lines or a single JSON document.

use anyhow::Result;
use serde::Serialize;

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}

/// Output settings shared by all commands
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
    quiet: bool,
}

impl Output {
    pub fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }

    /// True when results should be printed as JSON
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print a JSON document
    pub fn json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a result line
    pub fn line(&self, line: impl AsRef<str>) {
        println!("{}", line.as_ref());
    }

    /// Print a summary line, unless quiet
    pub fn success(&self, message: impl AsRef<str>) {
        if !self.quiet && !self.json {
            println!("{} {}", status::SUCCESS, message.as_ref());
        }
    }

    /// Print a warning line to stderr, unless quiet
    pub fn warning(&self, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{} {}", status::WARNING, message.as_ref());
        }
    }
}

/// Print an error with its cause chain
pub fn display_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", status::ERROR);
}
