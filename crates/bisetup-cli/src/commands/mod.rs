//! Command handlers.
//!
//! Each handler takes already-parsed arguments, the loaded configuration and
//! the [`crate::output::OutputManager`], and returns a `CliResult`.

pub mod completions;
pub mod config;
pub mod init;
pub mod setup;
