//! Error types and load result structures for the rule loader.

use std::path::PathBuf;

use crate::compiled::RuleDefinitionError;

/// Errors that can occur while loading a single rule file.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse/deserialization error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed pattern or operand.
    #[error("Rule definition error: {0}")]
    Definition(#[from] RuleDefinitionError),

    /// File extension that is neither JSON nor YAML.
    #[error("Unknown rule format: {}", .0.display())]
    UnknownFormat(PathBuf),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Outcome of loading a single rule file.
#[derive(Debug)]
pub struct LoadResult {
    /// Resource type the file belongs to.
    pub resource_type: String,
    /// Path to the file that was loaded.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file load attempt.
#[derive(Debug)]
pub enum LoadStatus {
    /// Rule was successfully loaded.
    Loaded { rule_name: String },
    /// File was skipped (dotfile, unknown extension, etc.).
    Skipped { reason: String },
    /// Parse or compile error occurred.
    Failed { error: String },
}

impl LoadResult {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, LoadStatus::Failed { .. })
    }
}
