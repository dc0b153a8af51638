//! In-memory filesystem adapter for testing.
//!
//! Paths are compared after dropping `.` components, so `./dash` and `dash`
//! name the same entry.

use std::{
    collections::{HashMap, HashSet},
    path::{Component, Path, PathBuf},
    sync::{Arc, RwLock},
};

use bisetup_core::{
    application::{ApplicationError, ports::Filesystem},
    error::BiResult,
};

/// In-memory filesystem for testing.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.directories.contains(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_dir(path) || self.files.contains_key(path)
    }

    fn parent_exists(&self, path: &Path) -> bool {
        path.parent().is_none_or(|p| self.is_dir(p))
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn fs_error(path: &Path, reason: &str) -> bisetup_core::error::BiError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Create a directory and all its parents (testing helper).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut inner = self.inner.write().unwrap();
        let mut current = PathBuf::new();
        for component in normalize(path.as_ref()).components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
    }

    /// Write a file, creating parent directories (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = normalize(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        let mut inner = self.inner.write().unwrap();
        inner.files.insert(path, content.to_string());
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(&normalize(path.as_ref())).cloned()
    }

    /// Check if a file (not a directory) exists.
    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(&normalize(path.as_ref()))
    }

    /// List all directories, sorted.
    pub fn list_dirs(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        let mut dirs: Vec<_> = inner.directories.iter().cloned().collect();
        dirs.sort();
        dirs
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        let mut files: Vec<_> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.exists(&normalize(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.is_dir(&normalize(path))
    }

    fn create_dir(&self, path: &Path) -> BiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::FilesystemLockPoisoned)?;
        let path = normalize(path);

        if inner.exists(&path) {
            return Err(fs_error(&path, "Already exists"));
        }
        if !inner.parent_exists(&path) {
            return Err(fs_error(&path, "Parent directory does not exist"));
        }

        inner.directories.insert(path);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> BiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::FilesystemLockPoisoned)?;
        let path = normalize(path);

        match inner.files.remove(&path) {
            Some(_) => Ok(()),
            None => Err(fs_error(&path, "No such file")),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> BiResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::FilesystemLockPoisoned)?;
        let from = normalize(from);
        let to = normalize(to);

        if !inner.exists(&from) {
            return Err(fs_error(&from, "No such file or directory"));
        }
        if inner.exists(&to) {
            return Err(fs_error(&to, "Destination already exists"));
        }
        if !inner.parent_exists(&to) {
            return Err(fs_error(&to, "Parent directory does not exist"));
        }

        let moved = |p: &Path| -> Option<PathBuf> {
            p.strip_prefix(&from).ok().map(|rest| to.join(rest))
        };

        let directories: HashSet<PathBuf> = inner
            .directories
            .drain()
            .map(|d| moved(&d).unwrap_or(d))
            .collect();
        let files: HashMap<PathBuf, String> = inner
            .files
            .drain()
            .map(|(p, c)| (moved(&p).unwrap_or(p), c))
            .collect();
        inner.directories = directories;
        inner.files = files;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.create_dir(Path::new("a/b")).is_err());
        fs.create_dir(Path::new("a")).unwrap();
        fs.create_dir(Path::new("a/b")).unwrap();
        assert!(fs.is_dir(Path::new("./a/b")));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let fs = MemoryFilesystem::new();
        let shared = fs.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.inner.write().unwrap();
            panic!("writer died");
        })
        .join();

        let err = fs.create_dir(Path::new("a")).unwrap_err();
        assert!(matches!(
            err,
            bisetup_core::error::BiError::Application(ApplicationError::FilesystemLockPoisoned)
        ));
    }

    #[test]
    fn create_dir_rejects_existing() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("a");
        assert!(fs.create_dir(Path::new("a")).is_err());
    }

    #[test]
    fn rename_moves_subtree() {
        let fs = MemoryFilesystem::new();
        fs.add_file("dash/sources/needful_things/connection.yaml", "name: x");
        fs.add_dir("dash/pages");

        fs.rename(Path::new("dash"), Path::new("sales")).unwrap();

        assert!(!fs.exists(Path::new("dash")));
        assert!(fs.is_dir(Path::new("sales/pages")));
        assert_eq!(
            fs.read_file("sales/sources/needful_things/connection.yaml")
                .as_deref(),
            Some("name: x")
        );
    }

    #[test]
    fn rename_does_not_touch_sibling_with_common_prefix() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("dash");
        fs.add_dir("dashboard");

        fs.rename(Path::new("dash"), Path::new("sales")).unwrap();
        assert!(fs.is_dir(Path::new("dashboard")));
    }

    #[test]
    fn rename_refuses_existing_destination() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("a");
        fs.add_dir("b");
        assert!(fs.rename(Path::new("a"), Path::new("b")).is_err());
        assert!(fs.is_dir(Path::new("a")));
    }

    #[test]
    fn remove_file_only_removes_files() {
        let fs = MemoryFilesystem::new();
        fs.add_file("a/x.duckdb", "");
        assert!(fs.remove_file(Path::new("a")).is_err());
        fs.remove_file(Path::new("a/x.duckdb")).unwrap();
        assert!(!fs.is_file("a/x.duckdb"));
        assert!(fs.is_dir(Path::new("a")));
    }
}
