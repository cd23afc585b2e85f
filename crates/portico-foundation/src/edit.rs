//! Planned text edits and per-file outcomes.

use std::ops::Range;

/// A planned substitution over a fixed original text.
///
/// `start` and `end` are UTF-8 byte offsets into the original, unmodified
/// text and describe the half-open range `[start, end)`. Edits of one pass
/// never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub content: String,
}

impl Edit {
    pub fn new(start: usize, end: usize, content: impl Into<String>) -> Self {
        Self {
            start,
            end,
            content: content.into(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Outcome of running the import rewrite over one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitResult {
    /// No import needed rewriting; nothing was written
    Unchanged,
    /// The file's new text, already written back to the store
    Rewritten(String),
}

impl UnitResult {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Rewritten(_))
    }

    /// New text, if the file changed
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Unchanged => None,
            Self::Rewritten(text) => Some(text),
        }
    }
}
