//! Paths derived from a request: where the template lands, which folders get
//! created, which file is deleted and where everything is renamed to.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{error::DomainError, request::ProjectRequest};

/// Fixed names inside the fetched template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutNames {
    /// Data sources folder under the project root.
    pub sources_dir: String,
    /// Seed source folder shipped by the template, renamed after the target.
    pub seed_dir: String,
    /// Stale database artifact inside the seed folder.
    pub stale_artifact: String,
}

impl Default for LayoutNames {
    fn default() -> Self {
        Self {
            sources_dir: "sources".into(),
            seed_dir: "needful_things".into(),
            stale_artifact: "needful_things.duckdb".into(),
        }
    }
}

impl LayoutNames {
    pub fn validate(&self) -> Result<(), DomainError> {
        for (key, value) in [
            ("sources_dir", &self.sources_dir),
            ("seed_dir", &self.seed_dir),
            ("stale_artifact", &self.stale_artifact),
        ] {
            if !is_single_component(value) {
                return Err(DomainError::InvalidLayout(format!(
                    "{key} = '{value}' is not a single relative name"
                )));
            }
        }
        Ok(())
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Every path a setup run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub base_dir: PathBuf,
    pub project_root: PathBuf,
    pub sources_dir: PathBuf,
    pub seed_dir: PathBuf,
    pub stale_artifact: PathBuf,
    pub renamed_seed_dir: PathBuf,
    pub final_root: PathBuf,
}

impl ProjectLayout {
    pub fn new(
        base_dir: impl AsRef<Path>,
        request: &ProjectRequest,
        names: &LayoutNames,
    ) -> Result<Self, DomainError> {
        names.validate()?;

        let base_dir = base_dir.as_ref().to_path_buf();
        let project_root = base_dir.join(request.project_name());
        let sources_dir = project_root.join(&names.sources_dir);
        let seed_dir = sources_dir.join(&names.seed_dir);

        Ok(Self {
            stale_artifact: seed_dir.join(&names.stale_artifact),
            renamed_seed_dir: sources_dir.join(request.target_basename()),
            final_root: base_dir.join(request.target_name()),
            base_dir,
            project_root,
            sources_dir,
            seed_dir,
        })
    }

    /// Directories ensured by the setup, parent first.
    pub fn required_dirs(&self) -> [&Path; 2] {
        [&self.sources_dir, &self.seed_dir]
    }
}
