//! Inputs to a setup run that come from configuration rather than the user's
//! two positional names.

use std::path::PathBuf;

use crate::domain::{command::CommandTemplate, layout::LayoutNames};

/// Default template repository passed to the fetch command.
pub const DEFAULT_REPOSITORY: &str = "evidence-dev/template";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupSettings {
    /// Directory the template is fetched into and renames happen in.
    pub base_dir: PathBuf,
    pub repository: String,
    pub fetch_command: CommandTemplate,
    /// `None` skips the dependency install step.
    pub install_command: Option<CommandTemplate>,
    pub layout: LayoutNames,
}

impl Default for SetupSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            repository: DEFAULT_REPOSITORY.into(),
            fetch_command: default_fetch_command(),
            install_command: Some(default_install_command()),
            layout: LayoutNames::default(),
        }
    }
}

pub fn default_fetch_command() -> CommandTemplate {
    CommandTemplate::new(["npx", "degit", "{repository}", "{project}"])
}

pub fn default_install_command() -> CommandTemplate {
    CommandTemplate::new(["npm", "install"])
}
