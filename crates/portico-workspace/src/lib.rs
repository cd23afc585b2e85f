//! Workspace access for Portico
//!
//! The import rewrite never touches the filesystem directly. It goes through
//! the [`FileStore`] capability, so staged files created earlier in the same
//! pipeline are visible before they reach the disk:
//! - [`MemoryFileStore`]: purely in-memory, used by tests and for staging
//! - [`DiskFileStore`]: real filesystem with atomic per-file writes
//! - [`OverlayFileStore`]: staged writes layered over any base store
//!
//! Module boundaries are answered by a [`ModuleResolver`];
//! [`MarkerModuleResolver`] walks up the tree looking for a module marker file.

pub mod disk;
pub mod memory;
pub mod overlay;
pub mod resolver;

pub use disk::DiskFileStore;
pub use memory::MemoryFileStore;
pub use overlay::OverlayFileStore;
pub use resolver::{MarkerModuleResolver, ModuleResolver};

use portico_foundation::StoreResult;
use std::path::{Path, PathBuf};

/// Read/write access to file contents
///
/// Methods take `&self`; implementations use interior mutability so a store
/// can be shared between the rule and the resolver that queries it.
pub trait FileStore: Send + Sync {
    /// Read a whole file as UTF-8 text
    fn read_to_string(&self, path: &Path) -> StoreResult<String>;

    /// Replace the whole content of a file, creating it if needed
    fn write(&self, path: &Path, content: &str) -> StoreResult<()>;

    /// Whether a file or directory exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Immediate children of a directory, sorted. A missing directory or a
    /// path naming a file yields an empty list.
    fn read_dir(&self, path: &Path) -> StoreResult<Vec<PathBuf>>;
}

impl<T: FileStore + ?Sized> FileStore for &T {
    fn read_to_string(&self, path: &Path) -> StoreResult<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> StoreResult<()> {
        (**self).write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn read_dir(&self, path: &Path) -> StoreResult<Vec<PathBuf>> {
        (**self).read_dir(path)
    }
}
