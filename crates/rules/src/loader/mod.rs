//! Filesystem rule loader.
//!
//! Rules live in one subdirectory per resource type under the rules
//! directory, one rule per file, as JSON (`.json`) or YAML (`.yaml`/`.yml`).
//! Each file is parsed and compiled on its own; a broken file is reported and
//! skipped without affecting its siblings.

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{RuleLoader, RuleSet};
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
