use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a resource collection for one project.
///
/// Logged by the orchestrator; the affected report subtree is left absent.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("snapshot not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("malformed snapshot {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected snapshot shape in {}: {detail}", path.display())]
    Shape { path: PathBuf, detail: String },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no data for project '{project}'")]
    UnknownProject { project: String },
}
