//! keytool library
//!
//! Argument definitions and subcommand handlers for the `keytool` binary.

pub mod args;
pub mod commands;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
