use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use gcp_audit_core::ResourceObject;

use crate::cache::PluginCache;
use crate::error::AcquisitionError;
use crate::fetcher::ResourceFetcher;

use super::{items_at, kind_of, SnapshotStore};

/// Returns the array found at a fixed location of one snapshot file.
#[derive(Debug, Clone)]
pub struct ItemListFetcher {
    store: Arc<SnapshotStore>,
    file: &'static str,
    pointer: &'static str,
}

impl ItemListFetcher {
    pub fn new(store: Arc<SnapshotStore>, file: &'static str, pointer: &'static str) -> Self {
        Self {
            store,
            file,
            pointer,
        }
    }

    /// `compute.firewalls.list`
    pub fn firewalls(store: Arc<SnapshotStore>) -> Self {
        Self::new(store, "firewalls", "/items")
    }

    /// `sqladmin.instances.list`
    pub fn cloudsql(store: Arc<SnapshotStore>) -> Self {
        Self::new(store, "cloudsql", "/items")
    }

    /// `container.projects.zones.clusters.list`
    pub fn container_clusters(store: Arc<SnapshotStore>) -> Self {
        Self::new(store, "container_clusters", "/clusters")
    }

    /// `compute.projects.get`, metadata entries only.
    pub fn compute_common_instance_metadata(store: Arc<SnapshotStore>) -> Self {
        Self::new(
            store,
            "compute_common_instance_metadata",
            "/commonInstanceMetadata/items",
        )
    }
}

impl ResourceFetcher for ItemListFetcher {
    fn fetch(&self, project: &str) -> Result<Vec<ResourceObject>, AcquisitionError> {
        let path = self.store.project_file(project, self.file);
        let payload = self.store.read(&path)?;
        items_at(&payload, self.pointer, &path)
    }
}

/// Concatenates one access-control list from every bucket of a project.
///
/// The bucket listing is parsed once per project and shared through the
/// [`PluginCache`] by the bucket ACL and default object ACL fetchers.
#[derive(Debug, Clone)]
pub struct BucketAclFetcher {
    store: Arc<SnapshotStore>,
    cache: Arc<PluginCache>,
    field: &'static str,
}

const BUCKETS_FILE: &str = "buckets";
const BUCKETS_NAMESPACE: &str = "buckets";

impl BucketAclFetcher {
    /// Entries of each bucket's `acl`.
    pub fn buckets(store: Arc<SnapshotStore>, cache: Arc<PluginCache>) -> Self {
        Self {
            store,
            cache,
            field: "acl",
        }
    }

    /// Entries of each bucket's `defaultObjectAcl`.
    pub fn bucket_objects(store: Arc<SnapshotStore>, cache: Arc<PluginCache>) -> Self {
        Self {
            store,
            cache,
            field: "defaultObjectAcl",
        }
    }

    fn bucket_listing(&self, project: &str) -> Result<Arc<Value>, AcquisitionError> {
        let key = format!("list_{project}");
        self.cache
            .get_or_try_insert_with(BUCKETS_NAMESPACE, &key, || {
                let path = self.store.project_file(project, BUCKETS_FILE);
                let payload = self.store.read(&path)?;
                items_at(&payload, "/items", &path).map(Value::Array)
            })
    }
}

impl ResourceFetcher for BucketAclFetcher {
    fn fetch(&self, project: &str) -> Result<Vec<ResourceObject>, AcquisitionError> {
        let listing = self.bucket_listing(project)?;
        let buckets = listing.as_array().map(Vec::as_slice).unwrap_or(&[]);

        let mut entries = Vec::new();
        for bucket in buckets {
            match bucket.get(self.field) {
                Some(Value::Array(acl)) => entries.extend(acl.iter().cloned()),
                Some(other) => debug!(
                    project = %project,
                    bucket = %bucket.get("name").and_then(serde_json::Value::as_str).unwrap_or("?"),
                    field = %self.field,
                    found = kind_of(other),
                    "ignoring non-array access control list"
                ),
                None => {}
            }
        }
        Ok(entries)
    }
}

/// Project labels as `{label, value}` objects, in snapshot key order.
#[derive(Debug, Clone)]
pub struct ProjectLabelsFetcher {
    store: Arc<SnapshotStore>,
}

impl ProjectLabelsFetcher {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }
}

impl ResourceFetcher for ProjectLabelsFetcher {
    fn fetch(&self, project: &str) -> Result<Vec<ResourceObject>, AcquisitionError> {
        let path = self.store.project_file(project, "project");
        let payload = self.store.read(&path)?;
        match payload.get("labels") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Object(labels)) => Ok(labels
                .iter()
                .map(|(label, value)| json!({"label": label, "value": value}))
                .collect()),
            Some(other) => Err(AcquisitionError::Shape {
                path,
                detail: format!("expected 'labels' to be an object, found {}", kind_of(other)),
            }),
        }
    }
}
