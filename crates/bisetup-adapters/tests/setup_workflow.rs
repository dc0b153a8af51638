//! End-to-end setup runs against the in-memory and local filesystems.

use std::path::{Path, PathBuf};

use bisetup_adapters::{LocalFilesystem, MemoryFilesystem, RecordingRunner};
use bisetup_core::{
    application::{ApplicationError, ProjectSetupService, ports::Filesystem},
    domain::{
        CommandOutput, CommandTemplate, ProjectRequest, SetupSettings, SkipReason, Step,
        StepOutcome,
    },
    error::BiError,
};

/// A runner whose template fetch leaves behind what `degit` would:
/// `<project>/sources/needful_things/` with the stale duckdb file.
fn template_runner(fs: &MemoryFilesystem) -> RecordingRunner {
    let fs = fs.clone();
    RecordingRunner::new().on_run("npx", move |spec| {
        let project = spec.args.last().cloned().unwrap_or_default();
        fs.add_file(
            format!("{project}/sources/needful_things/needful_things.duckdb"),
            "db",
        );
        fs.add_file(
            format!("{project}/sources/needful_things/connection.yaml"),
            "type: duckdb",
        );
        fs.add_file(format!("{project}/package.json"), "{}");
    })
}

fn service(fs: &MemoryFilesystem, runner: &RecordingRunner) -> ProjectSetupService {
    ProjectSetupService::new(
        Box::new(fs.clone()),
        Box::new(runner.clone()),
        SetupSettings::default(),
    )
}

#[test]
fn full_run_produces_renamed_tree() {
    let fs = MemoryFilesystem::new();
    let runner = template_runner(&fs);

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    let report = service(&fs, &runner).run(&request).unwrap();

    assert!(!report.has_failures(), "{report:#?}");
    assert!(fs.is_dir(Path::new("sales_bi/sources/sales_bi")));
    assert_eq!(
        fs.read_file("sales_bi/sources/sales_bi/connection.yaml")
            .as_deref(),
        Some("type: duckdb")
    );
    assert!(!fs.is_file("sales_bi/sources/sales_bi/needful_things.duckdb"));
    assert!(!fs.exists(Path::new("dash")));
    assert_eq!(report.final_root, PathBuf::from("./sales_bi"));
}

#[test]
fn commands_run_in_order_with_expected_arguments() {
    let fs = MemoryFilesystem::new();
    let runner = template_runner(&fs);

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    service(&fs, &runner).run(&request).unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].to_string(), "npx degit evidence-dev/template dash");
    assert_eq!(calls[0].cwd.as_deref(), Some(Path::new(".")));
    assert_eq!(calls[1].to_string(), "npm install");
    assert_eq!(calls[1].cwd.as_deref(), Some(Path::new("./dash")));
}

#[test]
fn existing_target_subfolder_is_left_untouched() {
    let fs = MemoryFilesystem::new();
    let runner = template_runner(&fs);
    fs.add_file("dash/sources/sales_bi/keep.yaml", "mine");

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    let report = service(&fs, &runner).run(&request).unwrap();

    assert!(matches!(
        report.outcome(Step::RenameSeedDirectory),
        Some(StepOutcome::Skipped {
            reason: SkipReason::AlreadyExists,
            ..
        })
    ));
    assert!(!report.has_failures());
    // Both folders survive the top-level rename unchanged.
    assert_eq!(
        fs.read_file("sales_bi/sources/sales_bi/keep.yaml").as_deref(),
        Some("mine")
    );
    assert!(fs.is_dir(Path::new("sales_bi/sources/needful_things")));
}

#[test]
fn preexisting_directories_are_reported_as_existing() {
    let fs = MemoryFilesystem::new();
    let runner = template_runner(&fs);

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    let report = service(&fs, &runner).run(&request).unwrap();

    let ensured: Vec<_> = report.outcomes(Step::EnsureDirectories).collect();
    assert_eq!(ensured.len(), 2);
    assert!(ensured.iter().all(|o| matches!(
        o,
        StepOutcome::Skipped {
            reason: SkipReason::AlreadyExists,
            ..
        }
    )));
}

#[test]
fn missing_artifact_deletes_nothing() {
    let fs = MemoryFilesystem::new();
    let seeded = fs.clone();
    let runner = RecordingRunner::new().on_run("npx", move |_| {
        seeded.add_file("dash/sources/needful_things/connection.yaml", "x");
    });

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    let report = service(&fs, &runner).run(&request).unwrap();

    assert!(matches!(
        report.outcome(Step::RemoveStaleArtifact),
        Some(StepOutcome::Skipped {
            reason: SkipReason::NotFound,
            ..
        })
    ));
    assert_eq!(
        fs.list_files(),
        vec![PathBuf::from("sales_bi/sources/sales_bi/connection.yaml")]
    );
    assert!(!report.has_failures());
}

#[test]
fn template_without_sources_gets_them_created() {
    let fs = MemoryFilesystem::new();
    let seeded = fs.clone();
    let runner = RecordingRunner::new().on_run("npx", move |_| seeded.add_dir("dash"));

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    let report = service(&fs, &runner).run(&request).unwrap();

    assert!(
        report
            .outcomes(Step::EnsureDirectories)
            .all(|o| matches!(o, StepOutcome::Done { .. }))
    );
    assert!(fs.is_dir(Path::new("sales_bi/sources/sales_bi")));
}

#[test]
fn fetch_that_creates_nothing_fails_softly_afterwards() {
    // The command "succeeds" but leaves no project folder behind.
    let fs = MemoryFilesystem::new();
    let runner = RecordingRunner::new();

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    let report = service(&fs, &runner).run(&request).unwrap();

    // mkdir fails without the project root, and both renames have no source.
    assert!(report.outcome(Step::EnsureDirectories).unwrap().is_failed());
    assert!(report.outcome(Step::RenameSeedDirectory).unwrap().is_failed());
    assert!(report.outcome(Step::RenameProjectRoot).unwrap().is_failed());
    assert_eq!(report.steps.len(), 7);
}

#[test]
fn install_failure_aborts_before_filesystem_steps() {
    let fs = MemoryFilesystem::new();
    let runner = template_runner(&fs).fail("npm", CommandOutput::failure(1, "npm ERR! 404"));

    let request = ProjectRequest::new("dash", "sales_bi").unwrap();
    let err = service(&fs, &runner).run(&request).unwrap_err();

    assert!(matches!(
        err,
        BiError::Application(ApplicationError::CommandFailed { ref stderr, .. }) if stderr == "npm ERR! 404"
    ));
    // The stale artifact is still there: step 4 never ran.
    assert!(fs.is_file("dash/sources/needful_things/needful_things.duckdb"));
    assert!(!fs.exists(Path::new("sales_bi")));
}

#[test]
fn custom_commands_and_repository_are_used() {
    let fs = MemoryFilesystem::new();
    let seeded = fs.clone();
    let runner = RecordingRunner::new().on_run("git", move |_| seeded.add_dir("dash"));

    let settings = SetupSettings {
        repository: "acme/bi-template".into(),
        fetch_command: CommandTemplate::new([
            "git",
            "clone",
            "https://github.com/{repository}.git",
            "{project}",
        ]),
        install_command: Some(CommandTemplate::new(["pnpm", "install"])),
        ..SetupSettings::default()
    };
    let svc = ProjectSetupService::new(Box::new(fs.clone()), Box::new(runner.clone()), settings);
    svc.run(&ProjectRequest::new("dash", "x").unwrap()).unwrap();

    let calls = runner.calls();
    assert_eq!(
        calls[0].to_string(),
        "git clone https://github.com/acme/bi-template.git dash"
    );
    assert_eq!(calls[1].program, "pnpm");
}

#[test]
fn nested_target_needs_existing_parent() {
    let fs = MemoryFilesystem::new();
    let runner = template_runner(&fs);

    let request = ProjectRequest::new("dash", "reports/sales").unwrap();
    let report = service(&fs, &runner).run(&request).unwrap();

    // Inner rename uses the basename and succeeds.
    assert!(matches!(
        report.outcome(Step::RenameSeedDirectory),
        Some(StepOutcome::Done { .. })
    ));
    // `reports/` does not exist, so the top-level rename fails softly.
    assert!(report.outcome(Step::RenameProjectRoot).unwrap().is_failed());
    assert!(fs.is_dir(Path::new("dash/sources/sales")));
}

#[test]
fn local_filesystem_run_in_tempdir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let base = tmp.path().to_path_buf();

    let runner = RecordingRunner::new().on_run("npx", |spec| {
        let cwd = spec.cwd.clone().unwrap_or_default();
        let project = spec.args.last().cloned().unwrap_or_default();
        let seed = cwd.join(project).join("sources").join("needful_things");
        std::fs::create_dir_all(&seed).unwrap();
        std::fs::write(seed.join("needful_things.duckdb"), b"db").unwrap();
    });

    let settings = SetupSettings {
        base_dir: base.clone(),
        ..SetupSettings::default()
    };
    let svc = ProjectSetupService::new(Box::new(LocalFilesystem::new()), Box::new(runner), settings);
    let report = svc
        .run(&ProjectRequest::new("dash", "sales_bi").unwrap())
        .unwrap();

    assert!(!report.has_failures(), "{report:#?}");
    let fs = LocalFilesystem::new();
    assert!(fs.is_dir(&base.join("sales_bi").join("sources").join("sales_bi")));
    assert!(!fs.exists(&base.join("dash")));
    assert!(
        !fs.exists(
            &base
                .join("sales_bi")
                .join("sources")
                .join("sales_bi")
                .join("needful_things.duckdb")
        )
    );
}
