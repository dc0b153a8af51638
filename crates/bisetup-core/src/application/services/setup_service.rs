//! Project setup service - the sequential runner.
//!
//! A run is six steps, executed in order:
//! 1. Fetch the template (external command, fatal on failure)
//! 2. Install dependencies (external command, fatal on failure)
//! 3. Ensure `sources/` and `sources/<seed>/` exist
//! 4. Delete the stale artifact inside the seed folder
//! 5. Rename the seed folder after the target's last component
//! 6. Rename the project root to the target
//!
//! Steps 3 to 6 never abort: problems are logged and recorded in the
//! [`SetupReport`], and the next step runs. There is no rollback.

use std::path::Path;

use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem, NoopObserver, SetupObserver},
    },
    domain::{
        CommandSpec, CommandVars, ProjectLayout, ProjectRequest, SetupPlan, SetupReport,
        SetupSettings, SkipReason, Step, StepOutcome,
    },
    error::BiResult,
};

/// Everything derived from a request before the first side effect.
struct Prepared {
    layout: ProjectLayout,
    fetch: CommandSpec,
    install: Option<CommandSpec>,
    plan: SetupPlan,
}

/// Main setup service.
pub struct ProjectSetupService {
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    observer: Box<dyn SetupObserver>,
    settings: SetupSettings,
}

impl ProjectSetupService {
    /// Create a new setup service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
        settings: SetupSettings,
    ) -> Self {
        Self {
            filesystem,
            runner,
            observer: Box::new(NoopObserver),
            settings,
        }
    }

    /// Attach a progress observer.
    pub fn with_observer(mut self, observer: Box<dyn SetupObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn settings(&self) -> &SetupSettings {
        &self.settings
    }

    /// Describe the run without touching the filesystem or spawning anything.
    pub fn plan(&self, request: &ProjectRequest) -> BiResult<SetupPlan> {
        Ok(self.prepare(request)?.plan)
    }

    /// Perform the setup.
    ///
    /// Returns `Err` when the request or settings are invalid (nothing was
    /// done) or when the fetch/install command fails (later steps never ran).
    #[instrument(
        skip_all,
        fields(project = %request.project_name(), target = %request.target_name())
    )]
    pub fn run(&self, request: &ProjectRequest) -> BiResult<SetupReport> {
        let prepared = self.prepare(request)?;
        let layout = &prepared.layout;
        let mut report = SetupReport::start(request, &layout.final_root);

        info!(run_id = %report.run_id, "Project setup started");

        // 1. Template
        self.begin(&prepared, Step::FetchTemplate);
        let outcome = self.run_fatal(Step::FetchTemplate, &prepared.fetch)?;
        self.record(&mut report, Step::FetchTemplate, outcome);

        // 2. Dependencies
        self.begin(&prepared, Step::InstallDependencies);
        let outcome = match &prepared.install {
            Some(cmd) => self.run_fatal(Step::InstallDependencies, cmd)?,
            None => {
                info!("Dependency install disabled");
                StepOutcome::skipped(SkipReason::Disabled, "dependency install disabled")
            }
        };
        self.record(&mut report, Step::InstallDependencies, outcome);

        // 3-6. Filesystem adjustments, each independent of the others' success.
        self.begin(&prepared, Step::EnsureDirectories);
        for dir in layout.required_dirs() {
            let outcome = self.ensure_dir(dir);
            self.record(&mut report, Step::EnsureDirectories, outcome);
        }

        self.begin(&prepared, Step::RemoveStaleArtifact);
        let outcome = self.remove_stale_artifact(&layout.stale_artifact);
        self.record(&mut report, Step::RemoveStaleArtifact, outcome);

        self.begin(&prepared, Step::RenameSeedDirectory);
        let outcome = self.rename_dir(&layout.seed_dir, &layout.renamed_seed_dir, true);
        self.record(&mut report, Step::RenameSeedDirectory, outcome);

        self.begin(&prepared, Step::RenameProjectRoot);
        let outcome = self.rename_dir(&layout.project_root, &layout.final_root, false);
        self.record(&mut report, Step::RenameProjectRoot, outcome);

        report.finish();

        if report.has_failures() {
            warn!(
                failures = report.failures().count(),
                "Project setup finished with errors"
            );
        } else {
            info!(path = %layout.final_root.display(), "Project setup completed");
        }

        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn prepare(&self, request: &ProjectRequest) -> BiResult<Prepared> {
        let settings = &self.settings;
        let layout = ProjectLayout::new(&settings.base_dir, request, &settings.layout)?;

        let vars = CommandVars {
            project: request.project_name().to_owned(),
            repository: settings.repository.clone(),
        };
        let fetch = settings
            .fetch_command
            .render("template fetch", &vars, Some(layout.base_dir.as_path()))?;
        let install = settings
            .install_command
            .as_ref()
            .map(|t| t.render("dependency install", &vars, Some(layout.project_root.as_path())))
            .transpose()?;

        let plan = SetupPlan::build(&layout, &fetch, install.as_ref());

        Ok(Prepared {
            layout,
            fetch,
            install,
            plan,
        })
    }

    fn begin(&self, prepared: &Prepared, step: Step) {
        let description = prepared
            .plan
            .steps
            .iter()
            .find(|p| p.step == step)
            .map_or("", |p| p.description.as_str());
        debug!(step = %step, "{description}");
        self.observer.step_started(step, description);
    }

    fn record(&self, report: &mut SetupReport, step: Step, outcome: StepOutcome) {
        self.observer.step_finished(step, &outcome);
        report.record(step, outcome);
    }

    /// Run an external command whose failure ends the whole run.
    fn run_fatal(&self, step: Step, spec: &CommandSpec) -> BiResult<StepOutcome> {
        info!(step = %step, command = %spec, "Running command");

        let result = self.runner.run(spec).and_then(|output| {
            if !output.stdout.trim().is_empty() {
                debug!(command = %spec, stdout = %output.stdout.trim(), "Command output");
            }
            if !output.is_success() {
                return Err(ApplicationError::CommandFailed {
                    command: spec.to_string(),
                    status: output.status,
                    stderr: output.stderr.trim().to_owned(),
                }
                .into());
            }
            if !output.stderr.trim().is_empty() {
                warn!(command = %spec, "{}", output.stderr.trim());
            }
            Ok(())
        });

        match result {
            Ok(()) => Ok(StepOutcome::done(format!("`{spec}` finished"))),
            Err(e) => {
                error!(step = %step, error = %e, "Command failed, aborting");
                self.observer
                    .step_finished(step, &StepOutcome::failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn ensure_dir(&self, dir: &Path) -> StepOutcome {
        if self.filesystem.is_dir(dir) {
            info!(path = %dir.display(), "Directory already exists");
            return StepOutcome::skipped(
                SkipReason::AlreadyExists,
                format!("{} already exists", dir.display()),
            );
        }
        if self.filesystem.exists(dir) {
            error!(path = %dir.display(), "Path exists but is not a directory");
            return StepOutcome::failed(format!("{} exists but is not a directory", dir.display()));
        }

        match self.filesystem.create_dir(dir) {
            Ok(()) => {
                info!(path = %dir.display(), "Created directory");
                StepOutcome::done(format!("created {}", dir.display()))
            }
            Err(e) => {
                error!(path = %dir.display(), error = %e, "Could not create directory");
                StepOutcome::failed(e.to_string())
            }
        }
    }

    fn remove_stale_artifact(&self, file: &Path) -> StepOutcome {
        if !self.filesystem.exists(file) {
            info!(path = %file.display(), "Stale artifact not found");
            return StepOutcome::skipped(
                SkipReason::NotFound,
                format!("{} does not exist", file.display()),
            );
        }

        match self.filesystem.remove_file(file) {
            Ok(()) => {
                info!(path = %file.display(), "Deleted stale artifact");
                StepOutcome::done(format!("deleted {}", file.display()))
            }
            Err(e) => {
                error!(path = %file.display(), error = %e, "Could not delete stale artifact");
                StepOutcome::failed(e.to_string())
            }
        }
    }

    /// Rename `from` to `to`, never overwriting an existing destination.
    fn rename_dir(&self, from: &Path, to: &Path, require_dir: bool) -> StepOutcome {
        let present = if require_dir {
            self.filesystem.is_dir(from)
        } else {
            self.filesystem.exists(from)
        };
        if !present {
            error!(path = %from.display(), "Nothing to rename");
            return StepOutcome::failed(format!("{} does not exist to rename", from.display()));
        }
        if from == to {
            info!(path = %from.display(), "Already named as requested");
            return StepOutcome::skipped(
                SkipReason::Unchanged,
                format!("{} already has the requested name", from.display()),
            );
        }
        if self.filesystem.exists(to) {
            warn!(path = %to.display(), "Rename destination already exists, leaving it untouched");
            return StepOutcome::skipped(
                SkipReason::AlreadyExists,
                format!("{} already exists", to.display()),
            );
        }

        match self.filesystem.rename(from, to) {
            Ok(()) => {
                info!(from = %from.display(), to = %to.display(), "Renamed");
                StepOutcome::done(format!("renamed {} to {}", from.display(), to.display()))
            }
            Err(e) => {
                error!(from = %from.display(), to = %to.display(), error = %e, "Rename failed");
                StepOutcome::failed(e.to_string())
            }
        }
    }
}
