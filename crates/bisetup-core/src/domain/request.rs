//! The two names a setup run is driven by.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A validated setup request.
///
/// `project_name` is the directory the template is fetched into; it must be a
/// single path component. `target_name` is the final name of the project and
/// may contain separators (`reports/sales`), in which case only its last
/// component names the renamed seed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
    project_name: String,
    target_name: String,
    target_basename: String,
}

impl ProjectRequest {
    pub fn new(
        project_name: impl Into<String>,
        target_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let project_name = project_name.into();
        let target_name = target_name.into();

        validate_project_name(&project_name)?;
        let target_basename = target_basename(&target_name)?;

        Ok(Self {
            project_name,
            target_name,
            target_basename,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Last path component of the target name.
    pub fn target_basename(&self) -> &str {
        &self.target_basename
    }
}

impl fmt::Display for ProjectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.project_name, self.target_name)
    }
}

fn validate_project_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyName {
            field: "project name",
        });
    }
    if name == "." || name == ".." {
        return Err(DomainError::InvalidProjectName {
            name: name.into(),
            reason: "must name a new directory".into(),
        });
    }
    if name.contains('/') || name.contains('\\') {
        return Err(DomainError::InvalidProjectName {
            name: name.into(),
            reason: "cannot contain path separators".into(),
        });
    }
    Ok(())
}

fn target_basename(name: &str) -> Result<String, DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::EmptyName {
            field: "target name",
        });
    }

    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| DomainError::InvalidTargetName {
            name: name.into(),
            reason: "has no final folder name".into(),
        })
}
