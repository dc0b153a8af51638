//! Application ports (traits) for external dependencies.
//!
//! All ports here are driven (output) ports: the setup service calls them and
//! `bisetup-adapters` / the CLI implement them.
//!
//! - `Filesystem`: existence checks, mkdir, delete, rename
//! - `CommandRunner`: external processes (template fetch, dependency install)
//! - `SetupObserver`: progress notifications for the user interface

pub mod output;

pub use output::{CommandRunner, Filesystem, NoopObserver, SetupObserver};

#[cfg(test)]
pub use output::{MockCommandRunner, MockFilesystem};
