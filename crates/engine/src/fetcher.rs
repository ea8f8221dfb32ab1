use std::collections::HashMap;
use std::sync::Arc;

use gcp_audit_core::ResourceObject;

use crate::error::AcquisitionError;

/// Produces the resource collection of one resource type for a project.
///
/// Implementations are shared across the audit's worker threads.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, project: &str) -> Result<Vec<ResourceObject>, AcquisitionError>;
}

/// Blanket implementation so `Arc<dyn ResourceFetcher>` can be used directly.
impl<T: ResourceFetcher + ?Sized> ResourceFetcher for Arc<T> {
    fn fetch(&self, project: &str) -> Result<Vec<ResourceObject>, AcquisitionError> {
        (**self).fetch(project)
    }
}

/// Fixed per-project collections held in memory.
///
/// Projects without an entry fail with [`AcquisitionError::UnknownProject`].
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    collections: HashMap<String, Vec<ResourceObject>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: &str, objects: Vec<ResourceObject>) -> Self {
        self.collections.insert(project.to_string(), objects);
        self
    }
}

impl ResourceFetcher for StaticFetcher {
    fn fetch(&self, project: &str) -> Result<Vec<ResourceObject>, AcquisitionError> {
        self.collections
            .get(project)
            .cloned()
            .ok_or_else(|| AcquisitionError::UnknownProject {
                project: project.to_string(),
            })
    }
}
