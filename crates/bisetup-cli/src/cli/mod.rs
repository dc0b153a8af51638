//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.
//!
//! The default invocation takes two positionals and runs a setup. Helper
//! subcommands (`completions`, `config`, `init`) are optional and take no
//! setup arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand, ValueEnum, builder::NonEmptyStringValueParser,
    error::ErrorKind,
};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "create-bi",
    bin_name = "create-bi",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Bootstrap an Evidence BI project from a template",
    long_about = "create-bi fetches a BI project template, installs its \
                  dependencies, prepares the data-source folders and renames \
                  the result to the requested target name.",
    after_help = "EXAMPLES:\n\
        \x20 create-bi dash sales_bi\n\
        \x20 create-bi dash sales_bi --dir ~/work --skip-install\n\
        \x20 create-bi dash sales_bi --template acme/bi-template --dry-run\n\
        \x20 create-bi completions bash > ~/.local/share/bash-completion/completions/create-bi",
    subcommand_negates_reqs = true,
)]
pub struct Cli {
    /// Flags available on every invocation.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Arguments of the default setup run.
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Helper subcommand, if any.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse `args` and reject setup arguments given alongside a subcommand.
    ///
    /// Global flags may appear on either side of a subcommand name.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;
        if cli.command.is_some() && cli.setup.is_given() {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "setup arguments cannot be combined with a subcommand",
            ));
        }
        Ok(cli)
    }
}

// ── setup ─────────────────────────────────────────────────────────────────────

/// Arguments for the default `create-bi <PROJECT_NAME> <TARGET_NAME>` run.
#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Folder the template is fetched into.
    #[arg(
        value_name = "PROJECT_NAME",
        required = true,
        value_parser = NonEmptyStringValueParser::new(),
        help = "Folder name the template is fetched into"
    )]
    pub project_name: Option<String>,

    /// Final name of the project folder and of its data-source folder.
    #[arg(
        value_name = "TARGET_NAME",
        required = true,
        value_parser = NonEmptyStringValueParser::new(),
        help = "Final folder name for the project"
    )]
    pub target_name: Option<String>,

    /// Base directory the project is created in.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Base directory (default: current directory)"
    )]
    pub dir: Option<PathBuf>,

    /// Template repository handed to the fetch command.
    #[arg(
        short = 't',
        long = "template",
        value_name = "REPO",
        help = "Template repository, e.g. evidence-dev/template"
    )]
    pub template: Option<String>,

    /// Do not run the dependency install step.
    #[arg(long = "skip-install", help = "Skip the dependency install step")]
    pub skip_install: bool,

    /// Print the plan without touching the filesystem.
    #[arg(long = "dry-run", help = "Show the planned steps without running them")]
    pub dry_run: bool,
}

impl SetupArgs {
    /// `true` if any positional or setup flag was passed.
    fn is_given(&self) -> bool {
        self.project_name.is_some()
            || self.target_name.is_some()
            || self.dir.is_some()
            || self.template.is_some()
            || self.skip_install
            || self.dry_run
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// Helper subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 create-bi completions bash > ~/.local/share/bash-completion/completions/create-bi\n\
            \x20 create-bi completions zsh  > ~/.zfunc/_create-bi\n\
            \x20 create-bi completions fish > ~/.config/fish/completions/create-bi.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the active configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 create-bi config get template.repository\n\
            \x20 create-bi config list\n\
            \x20 create-bi config path"
    )]
    Config(ConfigCommands),

    /// Write a configuration file with the default values.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 create-bi init           # user config directory\n\
            \x20 create-bi init --local   # .create-bi.toml in CWD"
    )]
    Init(InitArgs),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `create-bi init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write to `.create-bi.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `create-bi completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `create-bi config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `template.repository`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
