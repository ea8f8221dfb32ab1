//! Namespace/key cache shared by fetchers within one audit run.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::debug;

/// Memoizes fetched payloads under `(namespace, key)`.
///
/// Created per audit run and handed to fetchers at construction, so two
/// plugins reading the same listing parse it once. Concurrent misses on the
/// same key may both compute; the last insert wins.
#[derive(Debug, Default)]
pub struct PluginCache {
    entries: RwLock<HashMap<(String, String), Arc<Value>>>,
}

impl PluginCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<Arc<Value>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    pub fn insert(&self, namespace: &str, key: &str, value: Value) -> Arc<Value> {
        let value = Arc::new(value);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert((namespace.to_string(), key.to_string()), Arc::clone(&value));
        value
    }

    /// Cached value for `(namespace, key)`, computing and storing it on a miss.
    /// Errors from `load` are returned and nothing is cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        namespace: &str,
        key: &str,
        load: impl FnOnce() -> Result<Value, E>,
    ) -> Result<Arc<Value>, E> {
        if let Some(value) = self.get(namespace, key) {
            debug!(namespace = %namespace, key = %key, "plugin cache hit");
            return Ok(value);
        }
        debug!(namespace = %namespace, key = %key, "plugin cache miss");
        Ok(self.insert(namespace, key, load()?))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn namespaces_are_separate() {
        let cache = PluginCache::new();
        cache.insert("buckets", "list_p1", json!(["a"]));
        assert_eq!(*cache.get("buckets", "list_p1").unwrap(), json!(["a"]));
        assert!(cache.get("iam", "list_p1").is_none());
    }

    #[test]
    fn loads_once_per_key() {
        let cache = PluginCache::new();
        let calls = Cell::new(0);
        let load = || {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(json!({"items": []}))
        };

        cache.get_or_try_insert_with("buckets", "list_p1", load).unwrap();
        cache.get_or_try_insert_with("buckets", "list_p1", load).unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = PluginCache::new();
        let err = cache.get_or_try_insert_with("buckets", "list_p1", || Err("boom"));
        assert_eq!(err.unwrap_err(), "boom");
        assert!(cache.is_empty());
    }
}
