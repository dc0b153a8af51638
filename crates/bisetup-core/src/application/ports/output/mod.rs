//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;

use crate::domain::{CommandOutput, CommandSpec, Step, StepOutcome};
use crate::error::BiResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `bisetup_adapters::filesystem::LocalFilesystem` (production)
/// - `bisetup_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a single directory; the parent must already exist.
    fn create_dir(&self, path: &Path) -> BiResult<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> BiResult<()>;

    /// Rename a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> BiResult<()>;
}

/// Port for running external programs.
///
/// Implemented by:
/// - `bisetup_adapters::process::ProcessRunner` (production)
/// - `bisetup_adapters::process::RecordingRunner` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `spec` to completion.
    ///
    /// Returns `Err` only when the program could not be started; a non-zero
    /// exit is reported through [`CommandOutput::status`].
    fn run(&self, spec: &CommandSpec) -> BiResult<CommandOutput>;
}

/// Progress notifications emitted while a setup runs.
pub trait SetupObserver: Send + Sync {
    fn step_started(&self, _step: Step, _description: &str) {}

    /// Called once per recorded outcome; a step may record several.
    fn step_finished(&self, _step: Step, _outcome: &StepOutcome) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SetupObserver for NoopObserver {}
