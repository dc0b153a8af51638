//! The fixed step sequence of a setup run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{command::CommandSpec, layout::ProjectLayout};

/// One step of the setup, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    FetchTemplate,
    InstallDependencies,
    EnsureDirectories,
    RemoveStaleArtifact,
    RenameSeedDirectory,
    RenameProjectRoot,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::FetchTemplate,
        Step::InstallDependencies,
        Step::EnsureDirectories,
        Step::RemoveStaleArtifact,
        Step::RenameSeedDirectory,
        Step::RenameProjectRoot,
    ];

    /// A failing fatal step aborts the run; the others are logged and skipped.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::FetchTemplate | Self::InstallDependencies)
    }

    /// 1-based position in the run.
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).map_or(0, |i| i + 1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchTemplate => "fetch-template",
            Self::InstallDependencies => "install-dependencies",
            Self::EnsureDirectories => "ensure-directories",
            Self::RemoveStaleArtifact => "remove-stale-artifact",
            Self::RenameSeedDirectory => "rename-seed-directory",
            Self::RenameProjectRoot => "rename-project-root",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub step: Step,
    pub description: String,
}

/// What a run would do, without doing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupPlan {
    pub steps: Vec<PlannedStep>,
}

impl SetupPlan {
    pub fn build(layout: &ProjectLayout, fetch: &CommandSpec, install: Option<&CommandSpec>) -> Self {
        let install = match install {
            Some(cmd) => format!("run `{cmd}` in {}", layout.project_root.display()),
            None => "skip dependency install (disabled)".to_string(),
        };

        let descriptions = [
            format!("run `{fetch}` in {}", layout.base_dir.display()),
            install,
            format!(
                "ensure {} and {} exist",
                layout.sources_dir.display(),
                layout.seed_dir.display()
            ),
            format!("delete {} if present", layout.stale_artifact.display()),
            format!(
                "rename {} to {}",
                layout.seed_dir.display(),
                layout.renamed_seed_dir.display()
            ),
            format!(
                "rename {} to {}",
                layout.project_root.display(),
                layout.final_root.display()
            ),
        ];

        Self {
            steps: Step::ALL
                .into_iter()
                .zip(descriptions)
                .map(|(step, description)| PlannedStep { step, description })
                .collect(),
        }
    }
}
