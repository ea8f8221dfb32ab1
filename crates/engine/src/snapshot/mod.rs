//! Fetchers backed by a directory of saved API responses.
//!
//! Layout:
//!
//! ```text
//! <root>/<project>/<resource>.json              per-project payloads
//! <root>/_folders/<id>/iam_policy.json          folder IAM policies
//! <root>/_organizations/<id>/iam_policy.json    organization IAM policies
//! ```
//!
//! Each file holds the raw response body of the matching API call. The
//! fetchers extract the item list the way the live collectors do.

mod iam;
mod plugins;


use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::AcquisitionError;

pub use iam::IamFetcher;
pub use plugins::{BucketAclFetcher, ItemListFetcher, ProjectLabelsFetcher};

/// Read-only view of a snapshot directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `<name>.json` in a project's directory.
    pub fn project_file(&self, project: &str, name: &str) -> PathBuf {
        self.root.join(project).join(format!("{name}.json"))
    }

    /// Path of the IAM policy of a folder or organization.
    pub fn ancestor_policy_file(&self, kind: &str, id: &str) -> PathBuf {
        self.root
            .join(format!("_{kind}s"))
            .join(id)
            .join("iam_policy.json")
    }

    /// Parse a snapshot file.
    pub fn read(&self, path: &Path) -> Result<Value, AcquisitionError> {
        debug!(path = %path.display(), "reading snapshot");
        let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AcquisitionError::NotFound {
                path: path.to_path_buf(),
            },
            _ => AcquisitionError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
        serde_json::from_str(&contents).map_err(|source| AcquisitionError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_project(&self, project: &str, name: &str) -> Result<Value, AcquisitionError> {
        self.read(&self.project_file(project, name))
    }

    /// Every project directory, sorted. Directories starting with `.` or
    /// `_` are not projects.
    pub fn list_projects(&self) -> std::io::Result<Vec<String>> {
        let mut projects = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }
            projects.push(name);
        }
        projects.sort();
        Ok(projects)
    }
}

/// The array at `pointer` in `payload`. A missing key means the API
/// returned no items.
pub(crate) fn items_at(
    payload: &Value,
    pointer: &str,
    path: &Path,
) -> Result<Vec<Value>, AcquisitionError> {
    match payload.pointer(pointer) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(AcquisitionError::Shape {
            path: path.to_path_buf(),
            detail: format!("expected an array at '{pointer}', found {}", kind_of(other)),
        }),
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
