//! Staged writes layered over a base store

use crate::{FileStore, MemoryFileStore};
use portico_foundation::StoreResult;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Transaction-scoped overlay
///
/// Reads consult staged content before the base store. Writes only touch the
/// staging layer until [`OverlayFileStore::commit`] flushes them.
#[derive(Debug)]
pub struct OverlayFileStore<B: FileStore> {
    base: B,
    staged: MemoryFileStore,
}

impl<B: FileStore> OverlayFileStore<B> {
    pub fn new(base: B) -> Self {
        Self {
            base,
            staged: MemoryFileStore::new(),
        }
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    /// Paths with pending writes, sorted
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.paths()
    }

    pub fn has_staged_changes(&self) -> bool {
        !self.staged.is_empty()
    }

    /// Drop every pending write
    pub fn discard(&self) -> usize {
        let dropped = self.staged.drain().len();
        debug!(dropped, "Discarded staged writes");
        dropped
    }

    /// Flush staged writes to the base store in path order.
    ///
    /// Stops at the first failing write. Files not yet flushed stay staged.
    pub fn commit(&self) -> StoreResult<usize> {
        let mut committed = 0;
        for path in self.staged.paths() {
            let content = self.staged.read_to_string(&path)?;
            self.base.write(&path, &content)?;
            self.staged.remove(&path);
            committed += 1;
        }
        info!(committed, "Committed staged writes");
        Ok(committed)
    }
}

impl<B: FileStore> FileStore for OverlayFileStore<B> {
    fn read_to_string(&self, path: &Path) -> StoreResult<String> {
        match self.staged.read_to_string(path) {
            Ok(content) => Ok(content),
            Err(_) => self.base.read_to_string(path),
        }
    }

    fn write(&self, path: &Path, content: &str) -> StoreResult<()> {
        self.staged.write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        self.staged.exists(path) || self.base.exists(path)
    }

    fn read_dir(&self, path: &Path) -> StoreResult<Vec<PathBuf>> {
        let mut children: BTreeSet<PathBuf> = self.base.read_dir(path)?.into_iter().collect();
        children.extend(self.staged.read_dir(path)?);
        Ok(children.into_iter().collect())
    }
}
