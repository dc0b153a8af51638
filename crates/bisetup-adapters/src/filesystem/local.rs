//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use bisetup_core::{application::ports::Filesystem, error::BiResult};
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir(&self, path: &Path) -> BiResult<()> {
        trace!(path = %path.display(), "mkdir");
        std::fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn remove_file(&self, path: &Path) -> BiResult<()> {
        trace!(path = %path.display(), "rm");
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> BiResult<()> {
        trace!(from = %from.display(), to = %to.display(), "mv");
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> bisetup_core::error::BiError {
    use bisetup_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_dir_is_single_level() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();

        let nested = tmp.path().join("a").join("b");
        assert!(fs.create_dir(&nested).is_err());

        fs.create_dir(&tmp.path().join("a")).unwrap();
        fs.create_dir(&nested).unwrap();
        assert!(fs.is_dir(&nested));
    }

    #[test]
    fn remove_file_and_missing_file() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let file = tmp.path().join("x.duckdb");
        std::fs::write(&file, b"db").unwrap();

        fs.remove_file(&file).unwrap();
        assert!(!fs.exists(&file));

        let err = fs.remove_file(&file).unwrap_err();
        assert!(err.to_string().contains("Failed to remove file"));
    }

    #[test]
    fn rename_moves_directory_tree() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let from = tmp.path().join("dash");
        std::fs::create_dir_all(from.join("sources")).unwrap();

        let to = tmp.path().join("sales");
        fs.rename(&from, &to).unwrap();
        assert!(!fs.exists(&from));
        assert!(fs.is_dir(&to.join("sources")));
    }
}
