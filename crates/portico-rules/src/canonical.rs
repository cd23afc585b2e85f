//! Module root to public specifier

use portico_foundation::{RewriteError, RewriteResult};
use std::path::{Component, Path};

/// Directory that holds one sub-directory per module (`<ws>/projects/<name>`)
pub const DEFAULT_CONTAINER_SEGMENT: &str = "projects";

/// Derive the public package specifier of a module from its root path.
///
/// The name is the path segment right after the first `container` segment,
/// so `/ws/projects/lib-b/src/lib` becomes `lib-b`. With a `workspace_root`
/// only the part of `module_root` below it is searched, and roots outside
/// the workspace fail. Roots without a container segment followed by a name
/// fail with `CanonicalizationMismatch`.
pub fn canonicalize(
    module_root: &Path,
    workspace_root: Option<&Path>,
    container: &str,
) -> RewriteResult<String> {
    let relative = match workspace_root {
        Some(root) => module_root
            .strip_prefix(root)
            .map_err(|_| RewriteError::canonicalization_mismatch(module_root))?,
        None => module_root,
    };

    let mut components = relative.components();
    while let Some(component) = components.next() {
        if component != Component::Normal(container.as_ref()) {
            continue;
        }
        return match components.next() {
            Some(Component::Normal(name)) => name
                .to_str()
                .map(str::to_string)
                .ok_or_else(|| RewriteError::canonicalization_mismatch(module_root)),
            _ => Err(RewriteError::canonicalization_mismatch(module_root)),
        };
    }
    Err(RewriteError::canonicalization_mismatch(module_root))
}
