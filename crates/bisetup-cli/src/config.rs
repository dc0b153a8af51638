//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the [`SetupSettings`]
//! derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied in [`AppConfig::to_settings`])
//! 2. Environment variables: `BISETUP_` prefix, `__` between nested keys,
//!    e.g. `BISETUP_TEMPLATE__REPOSITORY=acme/bi`
//! 3. Config file: `--config FILE`, else `.create-bi.toml` in the current
//!    directory over the user config file (both optional)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use bisetup_core::domain::{CommandTemplate, DEFAULT_REPOSITORY, LayoutNames, SetupSettings};

/// File name of a per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".create-bi.toml";

const ENV_PREFIX: &str = "BISETUP";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the project template comes from.
    pub template: TemplateConfig,
    /// Dependency install step.
    pub install: InstallConfig,
    /// Names inside the fetched template.
    pub layout: LayoutNames,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Repository handed to the fetch command as `{repository}`.
    pub repository: String,
    /// Argv template; `{project}` and `{repository}` are substituted.
    pub fetch_command: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let defaults = SetupSettings::default();
        Self {
            repository: DEFAULT_REPOSITORY.into(),
            fetch_command: defaults.fetch_command.argv().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub enabled: bool,
    /// Argv template, run inside the fetched project.
    pub command: Vec<String>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        let command = SetupSettings::default()
            .install_command
            .map(|c| c.argv().to_vec())
            .unwrap_or_default();
        Self {
            enabled: true,
            command,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; used when `--output-format` is
    /// left at `auto`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

/// Command-line values that take precedence over the loaded config.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub base_dir: Option<PathBuf>,
    pub repository: Option<String>,
    pub skip_install: bool,
}

impl AppConfig {
    /// Load configuration from defaults, file(s) and environment.
    ///
    /// `config_file` is the path passed via `--config`; it must exist when
    /// given. Without it the user and local files are read if present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        Self::load_from(config_file, &Self::config_path(), Path::new(LOCAL_CONFIG_FILE))
    }

    fn load_from(
        config_file: Option<&PathBuf>,
        user_path: &Path,
        local_path: &Path,
    ) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to serialise default config")?;

        let mut builder = Config::builder().add_source(defaults);

        builder = match config_file {
            Some(path) => builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            ),
            None => builder
                .add_source(File::from(user_path).format(FileFormat::Toml).required(false))
                .add_source(File::from(local_path).format(FileFormat::Toml).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("template.fetch_command")
                .with_list_parse_key("install.command"),
        );

        let config = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize::<Self>()
            .context("Configuration has an invalid shape")?;

        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.create-bi.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "bisetup", "create-bi")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Render as TOML, as written by `create-bi init`.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialise configuration")
    }

    /// Look up a dotted key such as `template.repository`.
    ///
    /// Lists are rendered space-separated. Returns `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "template.repository" => self.template.repository.clone(),
            "template.fetch_command" => self.template.fetch_command.join(" "),
            "install.enabled" => self.install.enabled.to_string(),
            "install.command" => self.install.command.join(" "),
            "layout.sources_dir" => self.layout.sources_dir.clone(),
            "layout.seed_dir" => self.layout.seed_dir.clone(),
            "layout.stale_artifact" => self.layout.stale_artifact.clone(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Every key [`Self::get`] understands.
    pub const KEYS: [&'static str; 9] = [
        "template.repository",
        "template.fetch_command",
        "install.enabled",
        "install.command",
        "layout.sources_dir",
        "layout.seed_dir",
        "layout.stale_artifact",
        "output.no_color",
        "output.format",
    ];

    /// Build the core settings, letting CLI flags win.
    pub fn to_settings(&self, overrides: SettingsOverrides) -> SetupSettings {
        let install_command = (self.install.enabled && !overrides.skip_install)
            .then(|| CommandTemplate::new(self.install.command.iter().cloned()));

        SetupSettings {
            base_dir: overrides.base_dir.unwrap_or_else(|| PathBuf::from(".")),
            repository: overrides
                .repository
                .unwrap_or_else(|| self.template.repository.clone()),
            fetch_command: CommandTemplate::new(self.template.fetch_command.iter().cloned()),
            install_command,
            layout: self.layout.clone(),
        }
    }
}
