//! Implementation of the default `create-bi <PROJECT_NAME> <TARGET_NAME>` run.
//!
//! Responsibility: translate CLI arguments and configuration into a
//! `ProjectRequest` plus `SetupSettings`, call the core setup service, and
//! display results. No business logic lives here.

use tracing::{info, instrument};

use bisetup_adapters::{LocalFilesystem, ProcessRunner};
use bisetup_core::{
    application::{CommandRunner, ProjectSetupService},
    domain::{ProjectRequest, SetupPlan, SetupReport},
    error::BiError,
};

use crate::{
    cli::{OutputFormat, SetupArgs, global::GlobalArgs},
    config::{AppConfig, SettingsOverrides},
    error::{CliError, CliResult},
    output::{OutputManager, ProgressReporter},
};

/// Execute a setup run.
///
/// Dispatch sequence:
/// 1. Validate the two names
/// 2. Merge configuration and flags into core settings
/// 3. Early-exit with the plan if `--dry-run`
/// 4. Run the six steps via `ProjectSetupService`
/// 5. Print the summary (or the JSON report)
#[instrument(skip_all, fields(project = ?args.project_name, target = ?args.target_name))]
pub fn execute(
    args: SetupArgs,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Names
    let request = build_request(&args)?;

    // 2. Settings and adapters
    let settings = config.to_settings(SettingsOverrides {
        base_dir: args.dir.clone(),
        repository: args.template.clone(),
        skip_install: args.skip_install,
    });

    // From -vv on, npm/degit talk to the terminal directly.
    let stream_output = global.verbose >= 2 && output.format() != OutputFormat::Json;
    let runner: Box<dyn CommandRunner> = if stream_output {
        Box::new(ProcessRunner::streaming())
    } else {
        Box::new(ProcessRunner::new())
    };
    let service = ProjectSetupService::new(Box::new(LocalFilesystem::new()), runner, settings);

    // 3. Dry run: describe but do not touch anything.
    if args.dry_run {
        let plan = service.plan(&request).map_err(CliError::Core)?;
        return show_plan(&request, &plan, &output);
    }

    // 4. Run
    output.header(&format!(
        "Creating '{}' from {}...",
        request.target_name(),
        service.settings().repository,
    ))?;
    info!(request = %request, "Setup started");

    let service =
        service.with_observer(Box::new(ProgressReporter::new(output.clone(), !stream_output)));
    let report = service.run(&request).map_err(CliError::Core)?;

    // 5. Summary
    if output.format() == OutputFormat::Json {
        output.json(&report)?;
    } else {
        show_summary(&report, &output)?;
    }

    Ok(())
}

fn build_request(args: &SetupArgs) -> CliResult<ProjectRequest> {
    let project = args
        .project_name
        .as_deref()
        .ok_or(CliError::MissingArgument {
            name: "<PROJECT_NAME>",
        })?;
    let target = args
        .target_name
        .as_deref()
        .ok_or(CliError::MissingArgument {
            name: "<TARGET_NAME>",
        })?;

    ProjectRequest::new(project, target).map_err(|e| CliError::Core(BiError::from(e)))
}

fn show_plan(request: &ProjectRequest, plan: &SetupPlan, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(plan)?;
        return Ok(());
    }

    output.info(&format!("Dry run: would set up {request}"))?;
    for planned in &plan.steps {
        output.print(&format!(
            "  {}. {}",
            planned.step.number(),
            planned.description
        ))?;
    }
    Ok(())
}

fn show_summary(report: &SetupReport, output: &OutputManager) -> CliResult<()> {
    let failures: Vec<_> = report.failures().collect();

    output.print("")?;
    if failures.is_empty() {
        output.success(&format!(
            "Project '{}' ready at {}",
            report.target_name,
            report.final_root.display(),
        ))?;
    } else {
        output.warning(&format!(
            "Finished with {} error(s); the project may need manual fixes:",
            failures.len(),
        ))?;
        for record in failures {
            output.print(&format!("  [{}] {}", record.step, record.outcome.message()))?;
        }
    }

    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", report.final_root.display()))?;
        output.print("  npm run dev")?;
    }

    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────
