//! Check table: which fetcher plugin feeds each resource type, and which
//! field of a fetched object names it in findings.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AuditError;

/// Configuration for one resource-type check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckSpec {
    /// Fetcher plugin name. Dotted module paths such as
    /// `util.plugins.firewalls` are accepted; only the last segment is used.
    pub plugin: String,
    /// Field of each fetched object reported as the finding's descriptor.
    pub descfield: String,
}

impl CheckSpec {
    pub fn new(plugin: &str, descfield: &str) -> Self {
        Self {
            plugin: plugin.to_string(),
            descfield: descfield.to_string(),
        }
    }

    /// Plugin name without any dotted module prefix.
    pub fn plugin_name(&self) -> &str {
        self.plugin.rsplit('.').next().unwrap_or(&self.plugin)
    }
}

/// Resource-type id → check configuration.
pub type CheckTable = BTreeMap<String, CheckSpec>;

/// The checks run when no checks file is supplied.
pub fn default_checks() -> CheckTable {
    [
        ("buckets", CheckSpec::new("buckets", "bucket")),
        ("bucket_objects", CheckSpec::new("bucket_objects", "entity")),
        ("cloudsql", CheckSpec::new("cloudsql", "name")),
        ("firewalls", CheckSpec::new("firewalls", "name")),
        ("iam", CheckSpec::new("iam", "role")),
    ]
    .into_iter()
    .map(|(id, spec)| (id.to_string(), spec))
    .collect()
}

/// Load a JSON checks file.
pub fn load_checks(path: &Path) -> Result<CheckTable, AuditError> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|source| AuditError::Checks {
        path: path.to_path_buf(),
        source,
    })
}
