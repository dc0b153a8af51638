//! Core domain layer for bisetup.
//!
//! Pure values: the user's request, the paths derived from it, the command
//! templates and the step/report types. No I/O happens here; the filesystem
//! and external processes are reached through ports in the application layer.

pub mod command;
pub mod error;
pub mod layout;
pub mod plan;
pub mod report;
pub mod request;
pub mod settings;

// Re-exports for convenience
pub use command::{CommandOutput, CommandSpec, CommandTemplate, CommandVars};
pub use error::{DomainError, ErrorCategory};
pub use layout::{LayoutNames, ProjectLayout};
pub use plan::{PlannedStep, SetupPlan, Step};
pub use report::{SetupReport, SkipReason, StepOutcome, StepRecord};
pub use request::ProjectRequest;
pub use settings::{DEFAULT_REPOSITORY, SetupSettings};
