//! Handling of module roots outside the expected workspace layout

use serde::{Deserialize, Serialize};

/// What to do when a cross-module import targets a module root that doesn't
/// contain the container segment followed by a module name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMismatchPolicy {
    /// Fail the file with `RewriteError::CanonicalizationMismatch`
    #[default]
    Error,
    /// Leave that import untouched and keep rewriting the others
    Skip,
    /// Rewrite the import to an empty specifier (`'';`)
    LegacyEmpty,
}
