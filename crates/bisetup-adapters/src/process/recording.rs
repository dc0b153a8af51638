//! Command runner double for tests.

use std::sync::{Arc, Mutex};

use bisetup_core::{
    application::ports::CommandRunner,
    domain::{CommandOutput, CommandSpec},
    error::BiResult,
};

type Effect = Arc<dyn Fn(&CommandSpec) + Send + Sync>;

/// Records every command instead of running it.
///
/// Commands succeed unless a failure was scripted for their program.
/// Effects let a test simulate what the real program would leave behind,
/// for example the directory a template fetch creates.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    failures: Vec<(String, CommandOutput)>,
    effects: Vec<(String, Effect)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every run of `program` return `output`.
    pub fn fail(mut self, program: impl Into<String>, output: CommandOutput) -> Self {
        self.failures.push((program.into(), output));
        self
    }

    /// Call `effect` whenever `program` runs successfully.
    pub fn on_run<F>(mut self, program: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&CommandSpec) + Send + Sync + 'static,
    {
        self.effects.push((program.into(), Arc::new(effect)));
        self
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl std::fmt::Debug for RecordingRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingRunner")
            .field("calls", &self.calls())
            .field("failures", &self.failures)
            .field("effects", &self.effects.len())
            .finish()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> BiResult<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(spec.clone());
        }

        if let Some((_, output)) = self.failures.iter().find(|(p, _)| *p == spec.program) {
            return Ok(output.clone());
        }

        for (_, effect) in self.effects.iter().filter(|(p, _)| *p == spec.program) {
            effect(spec);
        }
        Ok(CommandOutput::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn spec(program: &str) -> CommandSpec {
        CommandSpec {
            program: program.into(),
            args: vec![],
            cwd: None,
        }
    }

    #[test]
    fn records_calls_in_order() {
        let runner = RecordingRunner::new();
        runner.run(&spec("npx")).unwrap();
        runner.run(&spec("npm")).unwrap();
        let programs: Vec<_> = runner.calls().into_iter().map(|c| c.program).collect();
        assert_eq!(programs, vec!["npx", "npm"]);
    }

    #[test]
    fn scripted_failure_skips_effects() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let runner = RecordingRunner::new()
            .on_run("npm", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .fail("npm", CommandOutput::failure(1, "ERR"));

        let out = runner.run(&spec("npm")).unwrap();
        assert_eq!(out.status, Some(1));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
