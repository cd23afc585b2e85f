//! Turns cross-module imports into text edits

use crate::canonical::canonicalize;
use crate::scanner::ImportToken;
use portico_foundation::{Edit, LayoutMismatchPolicy, RewriteError, RewriteResult};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Statement terminator written after every rewritten specifier
const TERMINATOR: char = ';';

/// An import classified as crossing into another module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedImport {
    pub token: ImportToken,
    pub target_root: PathBuf,
}

pub struct EditPlanner<'a> {
    container: &'a str,
    workspace_root: Option<&'a Path>,
    on_mismatch: LayoutMismatchPolicy,
}

impl<'a> EditPlanner<'a> {
    pub fn new(container: &'a str, on_mismatch: LayoutMismatchPolicy) -> Self {
        Self {
            container,
            workspace_root: None,
            on_mismatch,
        }
    }

    /// Only look for the container segment below `root`
    pub fn with_workspace_root(mut self, root: Option<&'a Path>) -> Self {
        self.workspace_root = root;
        self
    }

    /// One edit per flagged import, in input order.
    ///
    /// Imports whose target root doesn't canonicalize are handled per the
    /// configured [`LayoutMismatchPolicy`].
    pub fn plan(&self, text: &str, flagged: &[FlaggedImport]) -> RewriteResult<Vec<Edit>> {
        let mut edits = Vec::with_capacity(flagged.len());
        for import in flagged {
            let specifier = match canonicalize(&import.target_root, self.workspace_root, self.container) {
                Ok(specifier) => specifier,
                Err(e @ RewriteError::CanonicalizationMismatch { .. }) => match self.on_mismatch {
                    LayoutMismatchPolicy::Error => return Err(e),
                    LayoutMismatchPolicy::Skip => {
                        warn!(
                            specifier = %import.token.specifier,
                            module_root = %import.target_root.display(),
                            "Leaving import untouched: module root outside workspace layout"
                        );
                        continue;
                    }
                    LayoutMismatchPolicy::LegacyEmpty => {
                        warn!(
                            specifier = %import.token.specifier,
                            module_root = %import.target_root.display(),
                            "Rewriting import to empty specifier: module root outside workspace layout"
                        );
                        String::new()
                    }
                },
                Err(e) => return Err(e),
            };
            edits.push(replacement_edit(text, &import.token, &specifier));
        }
        Ok(edits)
    }
}

/// Edit replacing the quoted literal with the quoted `specifier`.
///
/// When the literal ends its declaration, a directly following terminator is
/// consumed and exactly one is written. Anything else after the literal
/// (import attributes, comments) stays as it is.
pub fn replacement_edit(text: &str, token: &ImportToken, specifier: &str) -> Edit {
    let quote = token.quote;
    let literal = format!("{quote}{specifier}{quote}");

    let tail = text.get(token.end..token.statement_end).unwrap_or_default();
    if !tail.is_empty() && tail != ";" {
        return Edit::new(token.start, token.end, literal);
    }

    let followed_by_terminator = text
        .get(token.end..)
        .is_some_and(|rest| rest.starts_with(TERMINATOR));
    let end = if followed_by_terminator {
        token.end + TERMINATOR.len_utf8()
    } else {
        token.end
    };
    Edit::new(token.start, end, format!("{literal}{TERMINATOR}"))
}
