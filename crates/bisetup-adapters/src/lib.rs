//! Infrastructure adapters for bisetup.
//!
//! This crate implements the ports defined in `bisetup-core::application::ports`.
//! It contains all filesystem and process I/O.

pub mod filesystem;
pub mod process;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{ProcessRunner, RecordingRunner};
