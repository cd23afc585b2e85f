//! Module root resolution
//!
//! A module root is the directory forming the boundary of one logical code
//! module. The marker-based resolver mirrors how Angular workspaces are laid
//! out: the nearest ancestor directory holding an `*.module.ts` file (routing
//! modules excluded) owns everything below it.

use crate::FileStore;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Default suffix of a module marker file
pub const DEFAULT_MARKER_SUFFIX: &str = ".module.ts";

/// Marker suffixes that never define a module boundary by default
pub const DEFAULT_EXCLUDED_SUFFIXES: &[&str] = &["-routing.module.ts"];

/// Looks up the module root owning a path
pub trait ModuleResolver {
    /// Module root directory owning `path`, or `None` when no ancestor is a
    /// module root. `path` may name a file, a directory, or an extensionless
    /// import target that doesn't exist as such.
    fn resolve_module_root(&self, path: &Path) -> Option<PathBuf>;
}

impl<T: ModuleResolver + ?Sized> ModuleResolver for &T {
    fn resolve_module_root(&self, path: &Path) -> Option<PathBuf> {
        (**self).resolve_module_root(path)
    }
}

/// Resolver that walks up from a path looking for a module marker file
///
/// Every lookup goes through the file store, so staged files are honored.
pub struct MarkerModuleResolver<S: FileStore> {
    store: S,
    marker_suffix: String,
    excluded_suffixes: Vec<String>,
}

impl<S: FileStore> MarkerModuleResolver<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            marker_suffix: DEFAULT_MARKER_SUFFIX.to_string(),
            excluded_suffixes: DEFAULT_EXCLUDED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_marker_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.marker_suffix = suffix.into();
        self
    }

    pub fn with_excluded_suffixes<I, T>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.excluded_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    fn is_marker(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(&self.marker_suffix)
            && !self.excluded_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    fn holds_marker(&self, dir: &Path) -> bool {
        match self.store.read_dir(dir) {
            Ok(children) => children.iter().any(|child| self.is_marker(child)),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                false
            }
        }
    }
}

impl<S: FileStore> ModuleResolver for MarkerModuleResolver<S> {
    fn resolve_module_root(&self, path: &Path) -> Option<PathBuf> {
        for dir in path.ancestors() {
            if dir.as_os_str().is_empty() {
                break;
            }
            if self.holds_marker(dir) {
                trace!(path = %path.display(), root = %dir.display(), "Resolved module root");
                return Some(dir.to_path_buf());
            }
        }
        debug!(path = %path.display(), "No module root found");
        None
    }
}
