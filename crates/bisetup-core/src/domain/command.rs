//! External command descriptions.
//!
//! A [`CommandTemplate`] is an argv with `{placeholder}` slots, as it comes
//! from configuration. Rendering it against a [`CommandVars`] produces a
//! [`CommandSpec`] that a `CommandRunner` can execute.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Values substituted into command templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandVars {
    pub project: String,
    pub repository: String,
}

impl CommandVars {
    fn lookup(&self, key: &str) -> Option<&str> {
        match key {
            "project" => Some(&self.project),
            "repository" => Some(&self.repository),
            _ => None,
        }
    }
}

/// An argv template such as `["npx", "degit", "{repository}", "{project}"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandTemplate(Vec<String>);

impl CommandTemplate {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(argv.into_iter().map(Into::into).collect())
    }

    pub fn argv(&self) -> &[String] {
        &self.0
    }

    /// Substitute placeholders and split into program + args.
    ///
    /// `purpose` only appears in error messages.
    pub fn render(
        &self,
        purpose: &'static str,
        vars: &CommandVars,
        cwd: Option<&Path>,
    ) -> Result<CommandSpec, DomainError> {
        let mut rendered = self
            .0
            .iter()
            .map(|arg| substitute(arg, purpose, vars))
            .collect::<Result<Vec<_>, _>>()?;

        if rendered.is_empty() || rendered[0].trim().is_empty() {
            return Err(DomainError::EmptyCommand { purpose });
        }
        let program = rendered.remove(0);

        Ok(CommandSpec {
            program,
            args: rendered,
            cwd: cwd.map(Path::to_path_buf),
        })
    }
}

fn substitute(arg: &str, purpose: &'static str, vars: &CommandVars) -> Result<String, DomainError> {
    let mut out = String::with_capacity(arg.len());
    let mut rest = arg;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                let value = vars
                    .lookup(key)
                    .ok_or_else(|| DomainError::UnknownPlaceholder {
                        purpose,
                        placeholder: format!("{{{key}}}"),
                    })?;
                out.push_str(value);
                rest = &after[end + 1..];
            }
            // Unbalanced brace: keep the remainder verbatim.
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; `None` means the caller's current directory.
    pub cwd: Option<PathBuf>,
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What a finished command reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            status: Some(0),
            ..Self::default()
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> CommandVars {
        CommandVars {
            project: "dash".into(),
            repository: "evidence-dev/template".into(),
        }
    }

    #[test]
    fn renders_placeholders_into_argv() {
        let t = CommandTemplate::new(["npx", "degit", "{repository}", "{project}"]);
        let spec = t.render("template fetch", &vars(), None).unwrap();
        assert_eq!(spec.program, "npx");
        assert_eq!(spec.args, vec!["degit", "evidence-dev/template", "dash"]);
        assert_eq!(spec.cwd, None);
        assert_eq!(spec.to_string(), "npx degit evidence-dev/template dash");
    }

    #[test]
    fn placeholder_inside_argument() {
        let t = CommandTemplate::new(["git", "clone", "https://github.com/{repository}.git"]);
        let spec = t.render("template fetch", &vars(), None).unwrap();
        assert_eq!(spec.args[1], "https://github.com/evidence-dev/template.git");
    }

    #[test]
    fn working_directory_is_attached() {
        let t = CommandTemplate::new(["npm", "install"]);
        let spec = t
            .render("dependency install", &vars(), Some(Path::new("dash")))
            .unwrap();
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("dash")));
    }

    #[test]
    fn unknown_placeholder_is_error() {
        let t = CommandTemplate::new(["npx", "{nope}"]);
        assert!(matches!(
            t.render("template fetch", &vars(), None),
            Err(DomainError::UnknownPlaceholder { placeholder, .. }) if placeholder == "{nope}"
        ));
    }

    #[test]
    fn unbalanced_brace_is_kept() {
        let t = CommandTemplate::new(["echo", "a{b"]);
        let spec = t.render("template fetch", &vars(), None).unwrap();
        assert_eq!(spec.args, vec!["a{b"]);
    }

    #[test]
    fn empty_template_is_error() {
        let t = CommandTemplate::new(Vec::<String>::new());
        assert!(matches!(
            t.render("dependency install", &vars(), None),
            Err(DomainError::EmptyCommand { .. })
        ));
    }

    #[test]
    fn output_success_requires_zero_status() {
        assert!(CommandOutput::success().is_success());
        assert!(!CommandOutput::failure(1, "boom").is_success());
        assert!(!CommandOutput::default().is_success());
    }
}
