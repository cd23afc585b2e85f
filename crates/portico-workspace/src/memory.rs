//! In-memory file store

use crate::FileStore;
use dashmap::DashMap;
use portico_foundation::{StoreError, StoreResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File store backed by a concurrent map of path to content
///
/// Directories are implicit: a path is a directory when some stored file
/// lives below it.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: DashMap<PathBuf, String>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with files
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let store = Self::new();
        for (path, content) in files {
            store.files.insert(path.into(), content.into());
        }
        store
    }

    /// All stored file paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Remove one file, returning its content
    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files.remove(path).map(|(_, content)| content)
    }

    /// Remove every file, returning them sorted by path
    pub fn drain(&self) -> Vec<(PathBuf, String)> {
        let mut drained = Vec::with_capacity(self.files.len());
        for path in self.paths() {
            if let Some((path, content)) = self.files.remove(&path) {
                drained.push((path, content));
            }
        }
        drained
    }
}

impl FileStore for MemoryFileStore {
    fn read_to_string(&self, path: &Path) -> StoreResult<String> {
        self.files
            .get(path)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::not_found(path))
    }

    fn write(&self, path: &Path, content: &str) -> StoreResult<()> {
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self
                .files
                .iter()
                .any(|entry| entry.key().starts_with(path) && entry.key() != path)
    }

    fn read_dir(&self, path: &Path) -> StoreResult<Vec<PathBuf>> {
        let mut children = BTreeSet::new();
        for entry in self.files.iter() {
            let Ok(rest) = entry.key().strip_prefix(path) else {
                continue;
            };
            if let Some(first) = rest.components().next() {
                children.insert(path.join(first.as_os_str()));
            }
        }
        Ok(children.into_iter().collect())
    }
}
