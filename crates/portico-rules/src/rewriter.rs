//! Per-file orchestration of the import rewrite

use crate::canonical::DEFAULT_CONTAINER_SEGMENT;
use crate::classifier::{BoundaryClassifier, Classification};
use crate::patch::apply_edits;
use crate::planner::{EditPlanner, FlaggedImport};
use crate::scanner::SourceUnit;
use portico_foundation::{
    Edit, LayoutMismatchPolicy, RewriteError, RewriteResult, UnitResult,
};
use portico_workspace::{FileStore, ModuleResolver};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Knobs of the rewrite rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Path segment under which every module root lives
    pub container_segment: String,
    /// Workspace directory the container segment is searched below. Without
    /// one, the whole module root path is searched.
    pub workspace_root: Option<PathBuf>,
    pub on_layout_mismatch: LayoutMismatchPolicy,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            container_segment: DEFAULT_CONTAINER_SEGMENT.to_string(),
            workspace_root: None,
            on_layout_mismatch: LayoutMismatchPolicy::default(),
        }
    }
}

/// Rewrites cross-module relative imports of one file at a time
pub struct ImportRewriter<'a, S, R>
where
    S: FileStore + ?Sized,
    R: ModuleResolver + ?Sized,
{
    store: &'a S,
    resolver: &'a R,
    options: RewriteOptions,
}

impl<'a, S, R> ImportRewriter<'a, S, R>
where
    S: FileStore + ?Sized,
    R: ModuleResolver + ?Sized,
{
    pub fn new(store: &'a S, resolver: &'a R) -> Self {
        Self {
            store,
            resolver,
            options: RewriteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RewriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Read `path` from the store, rewrite its imports and write the result
    /// back. Nothing is written when the outcome is `Unchanged`.
    pub fn rewrite_imports(&self, path: &Path) -> RewriteResult<UnitResult> {
        let text = self
            .store
            .read_to_string(path)
            .map_err(|e| RewriteError::read(path, e))?;

        let result = self.rewrite_source(path, &text)?;
        if let UnitResult::Rewritten(new_text) = &result {
            self.store
                .write(path, new_text)
                .map_err(|e| RewriteError::write(path, e))?;
        }
        Ok(result)
    }

    /// Rewrite `text` as the content of `path` without touching the store
    pub fn rewrite_source(&self, path: &Path, text: &str) -> RewriteResult<UnitResult> {
        let unit = SourceUnit::parse(path, text)?;
        let edits = self.plan_edits(&unit)?;
        if edits.is_empty() {
            debug!(file = %path.display(), "No cross-module imports");
            return Ok(UnitResult::Unchanged);
        }

        let new_text = apply_edits(text, &edits)?;
        info!(
            file = %path.display(),
            edits = edits.len(),
            "Rewrote cross-module imports"
        );
        Ok(UnitResult::Rewritten(new_text))
    }

    /// Edits for every cross-module import of `unit`
    pub fn plan_edits(&self, unit: &SourceUnit<'_>) -> RewriteResult<Vec<Edit>> {
        let tokens = unit.imports();
        // Files without relative imports need no module lookup at all
        if !tokens.iter().any(|t| t.is_relative()) {
            return Ok(Vec::new());
        }

        let importing_root = self
            .resolver
            .resolve_module_root(unit.path())
            .ok_or_else(|| RewriteError::unresolved_module(unit.path()))?;

        let classifier = BoundaryClassifier::new(self.resolver);
        let mut flagged = Vec::new();
        for token in tokens {
            let classification = classifier.classify(&token, unit.path(), &importing_root)?;
            debug!(
                file = %unit.path().display(),
                specifier = %token.specifier,
                classification = classification.label(),
                "Classified import"
            );
            if let Classification::CrossModule(target_root) = classification {
                flagged.push(FlaggedImport { token, target_root });
            }
        }

        EditPlanner::new(&self.options.container_segment, self.options.on_layout_mismatch)
            .with_workspace_root(self.options.workspace_root.as_deref())
            .plan(unit.text(), &flagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_workspace::{MarkerModuleResolver, MemoryFileStore};
    use pretty_assertions::assert_eq;

    const FILE: &str = "/ws/projects/lib-a/src/feature.ts";

    fn store(source: &str) -> MemoryFileStore {
        MemoryFileStore::with_files([
            ("/ws/projects/lib-a/lib-a.module.ts", ""),
            ("/ws/projects/lib-b/lib-b.module.ts", ""),
            ("/ws/projects/lib-b/src/thing.ts", ""),
            (FILE, source),
        ])
    }

    #[test]
    fn test_unchanged_file_is_not_written() {
        let source = "import { Y } from 'rxjs';\n";
        let store = store(source);
        let resolver = MarkerModuleResolver::new(&store);
        let rewriter = ImportRewriter::new(&store, &resolver);

        assert_eq!(rewriter.rewrite_imports(Path::new(FILE)).unwrap(), UnitResult::Unchanged);
        assert_eq!(store.read_to_string(Path::new(FILE)).unwrap(), source);
    }

    #[test]
    fn test_rewritten_file_is_written_back() {
        let store = store("import { X } from '../../lib-b/src/thing';\n");
        let resolver = MarkerModuleResolver::new(&store);
        let rewriter = ImportRewriter::new(&store, &resolver);

        let result = rewriter.rewrite_imports(Path::new(FILE)).unwrap();
        assert_eq!(result.text(), Some("import { X } from 'lib-b';\n"));
        assert_eq!(
            store.read_to_string(Path::new(FILE)).unwrap(),
            "import { X } from 'lib-b';\n"
        );
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let store = store("");
        let resolver = MarkerModuleResolver::new(&store);
        let rewriter = ImportRewriter::new(&store, &resolver);

        let err = rewriter
            .rewrite_imports(Path::new("/ws/projects/lib-a/src/missing.ts"))
            .unwrap_err();
        assert!(matches!(err, RewriteError::Read { .. }));
    }

    #[test]
    fn test_importing_file_outside_any_module() {
        let store = MemoryFileStore::with_files([
            ("/ws/tools/script.ts", "import { a } from './a';\n"),
            ("/ws/tools/only-packages.ts", "import { b } from 'b';\n"),
        ]);
        let resolver = MarkerModuleResolver::new(&store);
        let rewriter = ImportRewriter::new(&store, &resolver);

        let err = rewriter
            .rewrite_imports(Path::new("/ws/tools/script.ts"))
            .unwrap_err();
        assert!(matches!(err, RewriteError::UnresolvedModule { .. }));

        // Only relative imports need a module root
        assert_eq!(
            rewriter
                .rewrite_imports(Path::new("/ws/tools/only-packages.ts"))
                .unwrap(),
            UnitResult::Unchanged
        );
    }
}
