//! File storage seam.
//!
//! The engine never touches the filesystem directly; operations go through a
//! [`Store`]. The write happens once per successful pipeline, after transform
//! and print both succeed, so a file is either left untouched or fully
//! replaced.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage operations the engine needs.
pub trait Store {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> io::Result<String>;
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Store backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsStore;

impl OsStore {
    pub fn new() -> Self {
        Self
    }
}

impl Store for OsStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// In-memory store for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a file.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), contents.into());
    }

    /// Current contents of a file, if present.
    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl Store for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{}", path.display())))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let path = Path::new("src/app.php");
        assert!(!store.exists(path));

        store.insert(path, "<?php\n$x = 1;");
        assert!(store.exists(path));
        assert_eq!(store.read(path).unwrap(), "<?php\n$x = 1;");

        store.write(path, "<?php\n$x = 2;").unwrap();
        assert_eq!(store.get(path).unwrap(), "<?php\n$x = 2;");
    }

    #[test]
    fn test_memory_store_read_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.read(Path::new("missing.php")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
