//! Error handling for file stores and the import rewrite rule

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a file store backend
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create a new not found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Wrap an I/O error, mapping `NotFound` to its dedicated variant
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Path the failed operation targeted
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Io { path, .. } => path,
        }
    }
}

/// Result type alias for file store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced while rewriting the imports of one file
///
/// Skip vs. rewrite is never signalled through this type. Every variant is
/// fatal for the file being processed; the caller decides whether to abort
/// the batch or move on.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RewriteError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("No module root found for {}", path.display())]
    UnresolvedModule { path: PathBuf },

    #[error("Module root {} does not match the workspace layout", module_root.display())]
    CanonicalizationMismatch { module_root: PathBuf },

    #[error("Invalid edit: {message}")]
    InvalidEdit { message: String },
}

impl RewriteError {
    /// Create a new read error
    pub fn read(path: impl Into<PathBuf>, source: StoreError) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a new write error
    pub fn write(path: impl Into<PathBuf>, source: StoreError) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a new parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new unresolved module error
    pub fn unresolved_module(path: impl Into<PathBuf>) -> Self {
        Self::UnresolvedModule { path: path.into() }
    }

    /// Create a new canonicalization mismatch error
    pub fn canonicalization_mismatch(module_root: impl Into<PathBuf>) -> Self {
        Self::CanonicalizationMismatch {
            module_root: module_root.into(),
        }
    }

    /// Create a new invalid edit error
    pub fn invalid_edit(message: impl Into<String>) -> Self {
        Self::InvalidEdit {
            message: message.into(),
        }
    }
}

/// Result type alias for rewrite operations
pub type RewriteResult<T> = Result<T, RewriteError>;
