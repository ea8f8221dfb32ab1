//! Effective IAM bindings of a project, inherited along its ancestry.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::debug;

use gcp_audit_core::ResourceObject;

use crate::cache::PluginCache;
use crate::error::AcquisitionError;
use crate::fetcher::ResourceFetcher;

use super::{items_at, SnapshotStore};

/// Merges the IAM bindings of a project and every folder and organization
/// above it into one `{role, members}` object per role.
///
/// Reads `<project>/ancestry.json` (a `getAncestry` response, project
/// first) and each level's `iam_policy.json`. Policies are cached per level,
/// so a folder shared by many projects is parsed once per run. Members are
/// de-duplicated in first-seen order, walking from the organization down,
/// and expanded from `"type:id"` into `{type: id}`.
#[derive(Debug, Clone)]
pub struct IamFetcher {
    store: Arc<SnapshotStore>,
    cache: Arc<PluginCache>,
}

impl IamFetcher {
    pub fn new(store: Arc<SnapshotStore>, cache: Arc<PluginCache>) -> Self {
        Self { store, cache }
    }

    /// `(type, id)` of each ancestor, project first.
    fn ancestry(&self, project: &str) -> Result<Vec<(String, String)>, AcquisitionError> {
        let path = self.store.project_file(project, "ancestry");
        let payload = self.store.read(&path)?;
        let ancestors = items_at(&payload, "/ancestor", &path)?;

        ancestors
            .iter()
            .map(|ancestor| {
                let field = |name: &str| {
                    ancestor
                        .pointer(&format!("/resourceId/{name}"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                match (field("type"), field("id")) {
                    (Some(kind), Some(id)) => Ok((kind, id)),
                    _ => Err(AcquisitionError::Shape {
                        path: path.clone(),
                        detail: "ancestor without resourceId.type and resourceId.id".to_string(),
                    }),
                }
            })
            .collect()
    }

    fn bindings(&self, kind: &str, id: &str) -> Result<Arc<Value>, AcquisitionError> {
        let path = match kind {
            "project" => self.store.project_file(id, "iam_policy"),
            "folder" | "organization" => self.store.ancestor_policy_file(kind, id),
            other => {
                debug!(kind = %other, id = %id, "no IAM policy for ancestor type");
                return Ok(Arc::new(Value::Array(Vec::new())));
            }
        };
        self.cache
            .get_or_try_insert_with(&format!("iam_{kind}"), id, || {
                let policy = self.store.read(&path)?;
                items_at(&policy, "/bindings", &path).map(Value::Array)
            })
    }
}

impl ResourceFetcher for IamFetcher {
    fn fetch(&self, project: &str) -> Result<Vec<ResourceObject>, AcquisitionError> {
        let mut roles: IndexMap<String, Vec<String>> = IndexMap::new();

        for (kind, id) in self.ancestry(project)?.iter().rev() {
            let bindings = self.bindings(kind, id)?;
            for binding in bindings.as_array().into_iter().flatten() {
                let Some(role) = binding.get("role").and_then(Value::as_str) else {
                    continue;
                };
                let merged = roles.entry(role.to_string()).or_default();
                let members = binding
                    .get("members")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str);
                for member in members {
                    if !merged.iter().any(|m| m == member) {
                        merged.push(member.to_string());
                    }
                }
            }
        }

        Ok(roles
            .into_iter()
            .map(|(role, members)| {
                let members: Vec<Value> = members.iter().map(String::as_str).map(expand_member).collect();
                json!({"role": role, "members": members})
            })
            .collect())
    }
}

/// `"user:alice@example.com"` → `{"user": "alice@example.com"}`.
///
/// Members without a type prefix (`allUsers`, `allAuthenticatedUsers`)
/// become `{"allUsers": ""}`.
fn expand_member(member: &str) -> Value {
    let (kind, id) = member.split_once(':').unwrap_or((member, ""));
    let mut expanded = Map::new();
    expanded.insert(kind.to_string(), Value::String(id.to_string()));
    Value::Object(expanded)
}
