//! Application layer for bisetup.
//!
//! This layer contains:
//! - **Services**: the setup run orchestration (`ProjectSetupService`)
//! - **Ports**: traits for the filesystem, external processes and progress
//! - **Errors**: orchestration failures
//!
//! Paths and names are computed in `crate::domain`; this layer only sequences
//! the side effects.

pub mod error;
pub mod ports;
pub mod services;

pub use services::ProjectSetupService;

pub use ports::{CommandRunner, Filesystem, NoopObserver, SetupObserver};

pub use error::ApplicationError;
