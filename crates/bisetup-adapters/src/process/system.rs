//! Runs commands with `std::process::Command`.

use std::process::{Command, Stdio};

use bisetup_core::{
    application::{ApplicationError, ports::CommandRunner},
    domain::{CommandOutput, CommandSpec},
    error::BiResult,
};
use tracing::{debug, instrument};

/// Production command runner.
///
/// By default stdout and stderr are captured so the caller can show a
/// spinner; [`ProcessRunner::streaming`] passes them through to the terminal
/// instead (nothing is captured in that mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    stream_output: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streaming() -> Self {
        Self {
            stream_output: true,
        }
    }

    fn build(&self, spec: &CommandSpec) -> Command {
        // npx/npm are batch files on Windows and need the shell to resolve them.
        #[cfg(windows)]
        let mut cmd = {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&spec.program);
            c
        };
        #[cfg(not(windows))]
        let mut cmd = Command::new(&spec.program);

        cmd.args(&spec.args).stdin(Stdio::inherit());
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        if self.stream_output {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        cmd
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip_all, fields(command = %spec))]
    fn run(&self, spec: &CommandSpec) -> BiResult<CommandOutput> {
        debug!(cwd = ?spec.cwd, "Spawning");

        let output = self
            .build(spec)
            .output()
            .map_err(|e| ApplicationError::CommandSpawn {
                command: spec.to_string(),
                reason: e.to_string(),
            })?;

        debug!(status = ?output.status.code(), "Process exited");

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use bisetup_core::error::BiError;

    fn spec(program: &str, args: &[&str]) -> CommandSpec {
        CommandSpec {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: None,
        }
    }

    #[test]
    fn captures_stdout_and_status() {
        let out = ProcessRunner::new()
            .run(&spec("sh", &["-c", "echo hello; echo warn >&2"]))
            .unwrap();
        assert!(out.is_success());
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.stderr.trim(), "warn");
    }

    #[test]
    fn non_zero_exit_is_reported_not_raised() {
        let out = ProcessRunner::new()
            .run(&spec("sh", &["-c", "exit 3"]))
            .unwrap();
        assert_eq!(out.status, Some(3));
    }

    #[test]
    fn runs_in_working_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut s = spec("pwd", &[]);
        s.cwd = Some(tmp.path().to_path_buf());
        let out = ProcessRunner::new().run(&s).unwrap();
        let reported = std::fs::canonicalize(out.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = ProcessRunner::new()
            .run(&spec("definitely-not-a-real-program-bisetup", &[]))
            .unwrap_err();
        assert!(matches!(
            err,
            BiError::Application(ApplicationError::CommandSpawn { .. })
        ));
    }
}
