//! Unified error handling for bisetup core.
//!
//! Wraps domain and application errors behind one type with suggestions and
//! a display category.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for bisetup core operations.
#[derive(Debug, Error, Clone)]
pub enum BiError {
    /// Errors from the domain layer (invalid names, layout, command templates).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (external commands, filesystem).
    #[error("{0}")]
    Application(#[from] ApplicationError),
}

impl BiError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
            },
            Self::Application(e) => e.category(),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    /// A fatal external command (template fetch, dependency install) failed.
    ExternalCommand,
    Configuration,
    /// Local filesystem or adapter state failure.
    Internal,
}

/// Convenient result type alias.
pub type BiResult<T> = Result<T, BiError>;
