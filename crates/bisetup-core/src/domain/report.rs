//! Per-step results of a setup run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{plan::Step, request::ProjectRequest};

/// Why a step did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyExists,
    NotFound,
    /// Source and destination are the same path.
    Unchanged,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Done { detail: String },
    Skipped { reason: SkipReason, detail: String },
    Failed { error: String },
}

impl StepOutcome {
    pub fn done(detail: impl Into<String>) -> Self {
        Self::Done {
            detail: detail.into(),
        }
    }

    pub fn skipped(reason: SkipReason, detail: impl Into<String>) -> Self {
        Self::Skipped {
            reason,
            detail: detail.into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Done { detail } | Self::Skipped { detail, .. } => detail,
            Self::Failed { error } => error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupReport {
    pub run_id: Uuid,
    pub project_name: String,
    pub target_name: String,
    pub final_root: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
}

impl SetupReport {
    pub fn start(request: &ProjectRequest, final_root: impl Into<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            project_name: request.project_name().to_owned(),
            target_name: request.target_name().to_owned(),
            final_root: final_root.into(),
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::with_capacity(Step::ALL.len()),
        }
    }

    pub fn record(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push(StepRecord { step, outcome });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Last outcome recorded for `step`.
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .rev()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }

    /// All outcomes recorded for `step`, in order.
    pub fn outcomes(&self, step: Step) -> impl Iterator<Item = &StepOutcome> {
        self.steps
            .iter()
            .filter(move |r| r.step == step)
            .map(|r| &r.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|r| r.outcome.is_failed())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SetupReport {
        let req = ProjectRequest::new("dash", "sales").unwrap();
        SetupReport::start(&req, "sales")
    }

    #[test]
    fn outcome_returns_last_record() {
        let mut r = report();
        r.record(Step::EnsureDirectories, StepOutcome::done("created sources"));
        r.record(
            Step::EnsureDirectories,
            StepOutcome::skipped(SkipReason::AlreadyExists, "needful_things exists"),
        );
        assert!(matches!(
            r.outcome(Step::EnsureDirectories),
            Some(StepOutcome::Skipped { .. })
        ));
        assert_eq!(r.outcomes(Step::EnsureDirectories).count(), 2);
        assert!(r.outcome(Step::RenameProjectRoot).is_none());
    }

    #[test]
    fn failures_are_collected() {
        let mut r = report();
        assert!(!r.has_failures());
        r.record(Step::RenameSeedDirectory, StepOutcome::failed("missing"));
        assert!(r.has_failures());
        assert_eq!(r.failures().count(), 1);
    }

    #[test]
    fn finish_sets_timestamp() {
        let mut r = report();
        assert!(r.finished_at.is_none());
        r.finish();
        assert!(r.finished_at.unwrap() >= r.started_at);
    }

    #[test]
    fn serialises_with_status_tag() {
        let mut r = report();
        r.record(
            Step::RemoveStaleArtifact,
            StepOutcome::skipped(SkipReason::NotFound, "no artifact"),
        );
        let json = serde_json::to_value(&r).unwrap();
        let step = &json["steps"][0];
        assert_eq!(step["step"], "remove_stale_artifact");
        assert_eq!(step["outcome"]["status"], "skipped");
        assert_eq!(step["outcome"]["reason"], "not_found");
    }
}
