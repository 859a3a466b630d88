//! Infrastructure layer
//!
//! Handles filesystem traversal, descriptor reading and repository
//! inspection. This module is the only place where side effects occur.

pub mod descriptor;
pub mod discovery;
pub mod git;
