//! File store over the real filesystem

use crate::FileStore;
use portico_foundation::{StoreError, StoreResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Production file store
///
/// Writes go to a temporary file in the target directory which is then
/// renamed over the destination, so readers never observe a partial file.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFileStore;

impl DiskFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl FileStore for DiskFileStore {
    fn read_to_string(&self, path: &Path) -> StoreResult<String> {
        fs::read_to_string(path).map_err(|e| StoreError::io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> StoreResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(|e| StoreError::io(temp.path(), e))?;
        temp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> StoreResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Ok(Vec::new())
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(path, e))?;
            children.push(entry.path());
        }
        children.sort();
        Ok(children)
    }
}
