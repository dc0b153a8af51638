//! bisetup core - hexagonal layout of the project bootstrapper.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          bisetup-cli (create-bi)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        ProjectSetupService              │
//! │   fetch → install → mkdir → rm → mv     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Ports: Filesystem, CommandRunner,     │
//! │          SetupObserver                  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   bisetup-adapters (std::fs, processes) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bisetup_core::{
//!     application::ProjectSetupService,
//!     domain::{ProjectRequest, SetupSettings},
//! };
//! # fn adapters() -> (Box<dyn bisetup_core::application::Filesystem>, Box<dyn bisetup_core::application::CommandRunner>) { unimplemented!() }
//!
//! let (filesystem, runner) = adapters();
//! let service = ProjectSetupService::new(filesystem, runner, SetupSettings::default());
//! let request = ProjectRequest::new("my-dash", "sales_bi").unwrap();
//! let report = service.run(&request).unwrap();
//! assert!(!report.has_failures());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ProjectSetupService,
        ports::{CommandRunner, Filesystem, NoopObserver, SetupObserver},
    };
    pub use crate::domain::{
        CommandOutput, CommandSpec, CommandTemplate, LayoutNames, ProjectRequest, SetupPlan,
        SetupReport, SetupSettings, SkipReason, Step, StepOutcome,
    };
    pub use crate::error::{BiError, BiResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
