//! Public entry point import rule
//!
//! Rewrites relative imports that reach into another module's internals so
//! they go through that module's public package specifier instead:
//!
//! ```text
//! import { X } from '../../lib-b/src/lib/thing';   // before
//! import { X } from 'lib-b';                       // after
//! ```
//!
//! The pipeline for one file is
//! [`scanner`] -> [`classifier`] -> [`planner`] (using [`canonical`]) -> [`patch`],
//! orchestrated by [`ImportRewriter`].

pub mod canonical;
pub mod classifier;
pub mod patch;
pub mod planner;
pub mod rewriter;
pub mod scanner;

pub use canonical::{canonicalize, DEFAULT_CONTAINER_SEGMENT};
pub use classifier::{BoundaryClassifier, Classification};
pub use patch::apply_edits;
pub use planner::{EditPlanner, FlaggedImport};
pub use rewriter::{ImportRewriter, RewriteOptions};
pub use scanner::{ImportToken, SourceUnit};
