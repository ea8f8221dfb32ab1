use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid checks file {}: {source}", path.display())]
    Checks {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown fetcher plugin '{plugin}' for check '{check}'")]
    UnknownPlugin { check: String, plugin: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
