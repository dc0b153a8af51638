//! Output management and formatting.
//!
//! [`OutputManager`] writes human-facing lines to stdout (errors to stderr)
//! and JSON documents when `--output-format json` is active.
//! [`ProgressReporter`] turns setup progress events into those lines, with a
//! spinner while an external command runs.

use std::io::{self, IsTerminal};
use std::sync::Mutex;
use std::time::Duration;

use clap::ValueEnum;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use bisetup_core::application::SetupObserver;
use bisetup_core::domain::{SkipReason, Step, StepOutcome};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
#[derive(Debug, Clone)]
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
    err_term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = if args.output_format == OutputFormat::Auto {
            OutputFormat::from_str(&config.output.format, true).unwrap_or(OutputFormat::Auto)
        } else {
            args.output_format
        };

        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    /// Human lines are dropped in quiet mode and when stdout carries JSON.
    fn is_silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>` on stderr.  *Not* suppressed in quiet
    /// mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.err_term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.is_silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty-printed JSON document on stdout, regardless of quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// A ticking spinner on stderr, or `None` when nobody would see it.
    pub fn spinner(&self, msg: &str) -> Option<ProgressBar> {
        if self.is_silent()
            || self.resolved_format != OutputFormat::Human
            || !io::stderr().is_terminal()
        {
            return None;
        }

        let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── Progress ─────────────────────────────────────────────────────────────────

/// Prints one line per step outcome; spins while a command step runs.
pub struct ProgressReporter {
    output: OutputManager,
    spinners: bool,
    active: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    /// `spinners` should be off when command output goes straight to the
    /// terminal, or the two would interleave.
    pub fn new(output: OutputManager, spinners: bool) -> Self {
        Self {
            output,
            spinners,
            active: Mutex::new(None),
        }
    }

    fn stop_spinner(&self) {
        if let Some(pb) = self.active.lock().ok().and_then(|mut a| a.take()) {
            pb.finish_and_clear();
        }
    }
}

impl SetupObserver for ProgressReporter {
    fn step_started(&self, step: Step, description: &str) {
        let _ = self.output.print(&step_label(step, description));

        if !(step.is_fatal() && self.spinners) {
            return;
        }
        if let Some(pb) = self.output.spinner("working...") {
            if let Ok(mut active) = self.active.lock() {
                *active = Some(pb);
            }
        }
    }

    fn step_finished(&self, step: Step, outcome: &StepOutcome) {
        self.stop_spinner();

        let _ = match outcome {
            // The run aborts and the error is rendered once by the caller.
            StepOutcome::Failed { .. } if step.is_fatal() => Ok(()),
            StepOutcome::Done { detail } => self.output.success(detail),
            StepOutcome::Skipped {
                reason: SkipReason::AlreadyExists,
                detail,
            } => self.output.warning(detail),
            StepOutcome::Skipped { detail, .. } => self.output.info(detail),
            StepOutcome::Failed { error } => self.output.error(error),
        };
    }
}

/// `[3/6] ensure ./dash/sources and ./dash/sources/needful_things exist`
fn step_label(step: Step, description: &str) -> String {
    format!("[{}/{}] {}", step.number(), Step::ALL.len(), description)
}

// ── tests ─────────────────────────────────────────────────────────────────────
