use thiserror::Error;

/// Domain error type.
///
/// Raised before any process is spawned or any path is touched, so a
/// `DomainError` always means "nothing happened on disk".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("{field} cannot be empty")]
    EmptyName { field: &'static str },

    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("invalid target name '{name}': {reason}")]
    InvalidTargetName { name: String, reason: String },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    // ========================================================================
    // Command templates
    // ========================================================================
    #[error("command template for {purpose} is empty")]
    EmptyCommand { purpose: &'static str },

    #[error("unknown placeholder '{placeholder}' in {purpose} command")]
    UnknownPlaceholder {
        purpose: &'static str,
        placeholder: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::EmptyName { field } => vec![
                format!("Provide a non-empty {field}"),
                "Usage: create-bi <PROJECT_NAME> <TARGET_NAME>".into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "The project name is used as a single directory name".into(),
                "Use letters, digits, '-' and '_' (e.g. my-dashboard)".into(),
            ],
            Self::InvalidTargetName { .. } => vec![
                "The target name must end in a usable folder name".into(),
                "Examples: sales_bi, reports/sales_bi".into(),
            ],
            Self::InvalidLayout(_) => vec![
                "Check the [layout] section of your configuration".into(),
                "Each entry must be a single relative folder or file name".into(),
            ],
            Self::EmptyCommand { purpose } => vec![format!(
                "Set a command for {purpose} in your configuration"
            )],
            Self::UnknownPlaceholder { .. } => vec![
                "Supported placeholders: {project}, {repository}".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyName { .. }
            | Self::InvalidProjectName { .. }
            | Self::InvalidTargetName { .. } => ErrorCategory::Validation,
            Self::InvalidLayout(_) | Self::EmptyCommand { .. } | Self::UnknownPlaceholder { .. } => {
                ErrorCategory::Configuration
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
}
