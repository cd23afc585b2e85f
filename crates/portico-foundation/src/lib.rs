//! Foundation Layer - Core types and error handling
//!
//! This crate provides the building blocks shared by every Portico crate:
//! - Error types for file stores and the import rewrite rule
//! - Planned text edits and the per-file rewrite outcome
//! - The policy applied when a module root doesn't fit the workspace layout

pub mod edit;
pub mod error;
pub mod policy;

// Re-export commonly used types for convenience
pub use edit::{Edit, UnitResult};
pub use error::*;
pub use policy::LayoutMismatchPolicy;
