//! Application layer errors.
//!
//! These errors represent failures while performing the run, not invalid
//! input. Invalid input is `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The external program could not be started at all.
    #[error("could not start `{command}`: {reason}")]
    CommandSpawn { command: String, reason: String },

    /// The external program ran and exited unsuccessfully.
    #[error("`{command}` failed with {}", describe_status(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The in-memory filesystem lock was poisoned by a panicking writer.
    #[error("filesystem lock poisoned")]
    FilesystemLockPoisoned,
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".into(),
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::CommandSpawn { command, .. } => {
                let program = command.split_whitespace().next().unwrap_or_default();
                vec![
                    format!("Ensure '{program}' is installed and on your PATH"),
                    "Node.js provides both npx and npm: https://nodejs.org".into(),
                ]
            }
            Self::CommandFailed { stderr, .. } => {
                let mut out = vec!["Check the command output above for details".into()];
                if let Some(line) = stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                    out.push(format!("Last error line: {}", line.trim()));
                }
                out.push("Nothing after this step was run; remove the partial folder before retrying".into());
                out
            }
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::FilesystemLockPoisoned => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CommandSpawn { .. } | Self::CommandFailed { .. } => ErrorCategory::ExternalCommand,
            Self::FilesystemError { .. } | Self::FilesystemLockPoisoned => ErrorCategory::Internal,
        }
    }
}
