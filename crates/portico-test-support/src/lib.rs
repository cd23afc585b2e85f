//! Test fixtures for Portico
//!
//! [`TestWorkspace`] builds an in-memory Angular-style workspace
//! (`<root>/projects/<name>/...` with one `*.module.ts` per module) so rule
//! tests can run the whole pipeline without touching the disk.
//! [`PrefixModuleResolver`] assigns module roots from an explicit table when
//! a test needs boundaries that no marker layout expresses.

use portico_workspace::{FileStore, MarkerModuleResolver, MemoryFileStore, ModuleResolver};
use std::path::{Path, PathBuf};

/// In-memory workspace rooted at an absolute path
pub struct TestWorkspace {
    root: PathBuf,
    store: MemoryFileStore,
}

impl TestWorkspace {
    /// Creates a new empty workspace rooted at `/ws`.
    pub fn new() -> Self {
        Self::at("/ws")
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            store: MemoryFileStore::new(),
        }
    }

    /// Returns the root path of the workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Get the absolute path to a file in the workspace.
    pub fn absolute_path(&self, rel_path: &str) -> PathBuf {
        self.root.join(rel_path)
    }

    /// Adds a module under `projects/<name>` with its marker file at
    /// `projects/<name>/<name>.module.ts`.
    pub fn with_project(self, name: &str) -> Self {
        let marker = format!("projects/{name}/{name}.module.ts");
        let content = format!("export class {}Module {{}}\n", pascal_case(name));
        self.with_file(&marker, &content)
    }

    /// Creates a file with content within the workspace.
    pub fn with_file(self, rel_path: &str, content: &str) -> Self {
        self.create_file(rel_path, content);
        self
    }

    pub fn create_file(&self, rel_path: &str, content: &str) {
        let path = self.absolute_path(rel_path);
        self.store
            .write(&path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path.display(), e));
    }

    /// Reads a file from the workspace.
    pub fn read_file(&self, rel_path: &str) -> String {
        let path = self.absolute_path(rel_path);
        self.store
            .read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read file '{}': {}", path.display(), e))
    }

    pub fn store(&self) -> &MemoryFileStore {
        &self.store
    }

    /// Marker-based resolver over this workspace's store
    pub fn resolver(&self) -> MarkerModuleResolver<&MemoryFileStore> {
        MarkerModuleResolver::new(&self.store)
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolver mapping path prefixes to module roots; the longest prefix wins
#[derive(Debug, Default, Clone)]
pub struct PrefixModuleResolver {
    entries: Vec<(PathBuf, PathBuf)>,
}

impl PrefixModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path below `prefix` belongs to the module rooted at `root`
    pub fn with(mut self, prefix: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        self.entries.push((prefix.into(), root.into()));
        self
    }
}

impl ModuleResolver for PrefixModuleResolver {
    fn resolve_module_root(&self, path: &Path) -> Option<PathBuf> {
        self.entries
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix))
            .max_by_key(|(prefix, _)| prefix.components().count())
            .map(|(_, root)| root.clone())
    }
}

fn pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
