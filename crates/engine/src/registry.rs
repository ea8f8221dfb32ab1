//! Plugin name → fetcher registry, resolved against the check table at
//! startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use gcp_audit_core::{AuditError, CheckTable};

use crate::cache::PluginCache;
use crate::fetcher::ResourceFetcher;
use crate::snapshot::{
    BucketAclFetcher, IamFetcher, ItemListFetcher, ProjectLabelsFetcher, SnapshotStore,
};

/// A check whose plugin has been bound to a fetcher.
#[derive(Clone)]
pub struct ResolvedCheck {
    pub resource_type: String,
    pub descfield: String,
    pub fetcher: Arc<dyn ResourceFetcher>,
}

impl std::fmt::Debug for ResolvedCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCheck")
            .field("resource_type", &self.resource_type)
            .field("descfield", &self.descfield)
            .finish_non_exhaustive()
    }
}

/// Registered fetchers keyed by plugin name.
#[derive(Default)]
pub struct FetcherRegistry {
    fetchers: BTreeMap<String, Arc<dyn ResourceFetcher>>,
}

impl FetcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every shipped plugin, reading from `store` and sharing `cache`.
    pub fn snapshots(store: Arc<SnapshotStore>, cache: Arc<PluginCache>) -> Self {
        let mut registry = Self::new();
        registry.register("firewalls", ItemListFetcher::firewalls(Arc::clone(&store)));
        registry.register("cloudsql", ItemListFetcher::cloudsql(Arc::clone(&store)));
        registry.register(
            "container_clusters",
            ItemListFetcher::container_clusters(Arc::clone(&store)),
        );
        registry.register(
            "compute_common_instance_metadata",
            ItemListFetcher::compute_common_instance_metadata(Arc::clone(&store)),
        );
        registry.register(
            "buckets",
            BucketAclFetcher::buckets(Arc::clone(&store), Arc::clone(&cache)),
        );
        registry.register(
            "bucket_objects",
            BucketAclFetcher::bucket_objects(Arc::clone(&store), Arc::clone(&cache)),
        );
        registry.register("iam", IamFetcher::new(Arc::clone(&store), cache));
        registry.register("project_labels", ProjectLabelsFetcher::new(store));
        registry
    }

    /// Register (or replace) the fetcher for `plugin`.
    pub fn register(&mut self, plugin: &str, fetcher: impl ResourceFetcher + 'static) {
        debug!(plugin = %plugin, "registering fetcher");
        self.fetchers.insert(plugin.to_string(), Arc::new(fetcher));
    }

    pub fn get(&self, plugin: &str) -> Option<Arc<dyn ResourceFetcher>> {
        self.fetchers.get(plugin).cloned()
    }

    /// Registered plugin names, sorted.
    pub fn plugins(&self) -> impl Iterator<Item = &str> {
        self.fetchers.keys().map(String::as_str)
    }

    /// Bind every check to its fetcher. Any unknown plugin fails the whole
    /// resolution so configuration errors surface before an audit starts.
    pub fn resolve(&self, checks: &CheckTable) -> Result<Vec<ResolvedCheck>, AuditError> {
        checks
            .iter()
            .map(|(resource_type, spec)| {
                let fetcher =
                    self.get(spec.plugin_name())
                        .ok_or_else(|| AuditError::UnknownPlugin {
                            check: resource_type.clone(),
                            plugin: spec.plugin.clone(),
                        })?;
                Ok(ResolvedCheck {
                    resource_type: resource_type.clone(),
                    descfield: spec.descfield.clone(),
                    fetcher,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticFetcher;
    use gcp_audit_core::{default_checks, CheckSpec};
    use std::path::PathBuf;

    fn snapshot_registry() -> FetcherRegistry {
        FetcherRegistry::snapshots(
            Arc::new(SnapshotStore::new(PathBuf::from("snapshots"))),
            Arc::new(PluginCache::new()),
        )
    }

    #[test]
    fn snapshot_registry_covers_every_plugin() {
        let registry = snapshot_registry();
        let plugins: Vec<_> = registry.plugins().collect();
        assert_eq!(
            plugins,
            vec![
                "bucket_objects",
                "buckets",
                "cloudsql",
                "compute_common_instance_metadata",
                "container_clusters",
                "firewalls",
                "iam",
                "project_labels",
            ]
        );
    }

    #[test]
    fn resolves_default_checks() {
        let resolved = snapshot_registry().resolve(&default_checks()).unwrap();
        let types: Vec<_> = resolved.iter().map(|c| c.resource_type.as_str()).collect();
        assert_eq!(types, vec!["bucket_objects", "buckets", "cloudsql", "firewalls", "iam"]);
        assert_eq!(resolved[0].descfield, "entity");
    }

    #[test]
    fn resolves_dotted_plugin_paths() {
        let mut checks = CheckTable::new();
        checks.insert(
            "firewalls".to_string(),
            CheckSpec::new("util.plugins.firewalls", "name"),
        );
        assert_eq!(snapshot_registry().resolve(&checks).unwrap().len(), 1);
    }

    #[test]
    fn unknown_plugin_is_rejected() {
        let mut checks = CheckTable::new();
        checks.insert("dns".to_string(), CheckSpec::new("dns_zones", "name"));

        let err = snapshot_registry().resolve(&checks).unwrap_err();
        assert!(matches!(
            err,
            AuditError::UnknownPlugin { ref check, ref plugin } if check == "dns" && plugin == "dns_zones"
        ));
    }

    #[test]
    fn registered_fetcher_replaces_existing() {
        let mut registry = snapshot_registry();
        registry.register("firewalls", StaticFetcher::new());
        assert!(registry.get("firewalls").is_some());
        assert_eq!(registry.plugins().count(), 8);
    }
}
