//! Module boundary classification of import specifiers

use crate::scanner::ImportToken;
use portico_foundation::{RewriteError, RewriteResult};
use portico_workspace::ModuleResolver;
use std::path::{Component, Path, PathBuf};

/// Where an import points, relative to the importing file's module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Package import (`rxjs`, `@angular/core`); never touched
    External,
    /// Relative import staying inside the importing module
    SameModule,
    /// Relative import into another module, with that module's root
    CrossModule(PathBuf),
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Self::External => "external",
            Self::SameModule => "same-module",
            Self::CrossModule(_) => "cross-module",
        }
    }
}

pub struct BoundaryClassifier<'r, R: ModuleResolver + ?Sized> {
    resolver: &'r R,
}

impl<'r, R: ModuleResolver + ?Sized> BoundaryClassifier<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Classify one import of `importing_file`, whose module root is
    /// `importing_root`.
    ///
    /// A relative import whose target has no module root is an
    /// `UnresolvedModule` error.
    pub fn classify(
        &self,
        token: &ImportToken,
        importing_file: &Path,
        importing_root: &Path,
    ) -> RewriteResult<Classification> {
        if !token.is_relative() {
            return Ok(Classification::External);
        }

        let target = resolve_specifier(importing_file, &token.specifier);
        let target_root = self
            .resolver
            .resolve_module_root(&target)
            .ok_or_else(|| RewriteError::unresolved_module(&target))?;

        if target_root == importing_root {
            Ok(Classification::SameModule)
        } else {
            Ok(Classification::CrossModule(target_root))
        }
    }
}

/// Absolute path a relative specifier points at, seen from `importing_file`
pub fn resolve_specifier(importing_file: &Path, specifier: &str) -> PathBuf {
    let dir = importing_file.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&dir.join(specifier))
}

/// Lexically fold `.` and `..` segments
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            _ => result.push(component.as_os_str()),
        }
    }
    result
}
