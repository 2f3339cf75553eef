//! Durable cache storage abstraction.
//!
//! Coordinators persist their caches as JSON blobs under fixed keys, always
//! best-effort: a failed write is logged by the owning coordinator and never
//! surfaced. Payloads carry a version tag so a format change degrades to an
//! empty cache instead of a parse error.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::history::QueryHistoryItem;
use crate::types::AccountDomainCache;

/// Storage key for the per-account domain cache map.
pub const DOMAIN_CACHE_KEY: &str = "domain_cache";

/// Storage key for the toolbox query history.
pub const QUERY_HISTORY_KEY: &str = "query_history";

/// Version tag written into every persisted payload.
///
/// A payload with a different version is discarded on load.
pub const CACHE_VERSION: u32 = 1;

/// Key-value store for JSON blobs.
///
/// Implementations must be safe to call concurrently. Values are opaque
/// strings; the coordinators own the (de)serialization and the key space.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob.
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Remove the blob stored under `key`, if any.
    async fn remove(&self, key: &str) -> CoreResult<()>;
}

/// In-memory cache store.
///
/// Default implementation, used when no durable storage is configured and
/// throughout the test suite.
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryCacheStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Persisted shape of the domain cache map.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedDomainCache {
    /// Format version, see [`CACHE_VERSION`].
    pub version: u32,
    /// Cache entries keyed by account ID.
    pub entries: HashMap<String, AccountDomainCache>,
}

/// Persisted shape of the query history.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedQueryHistory {
    /// Format version, see [`CACHE_VERSION`].
    pub version: u32,
    /// History items, most recent first.
    pub items: Vec<QueryHistoryItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_roundtrip() {
        let store = InMemoryCacheStore::new();
        let got = store.get("k").await;
        assert!(matches!(got, Ok(None)), "unexpected result: {got:?}");

        let set = store.set("k", "v1").await;
        assert!(set.is_ok(), "set failed: {set:?}");
        let Ok(got) = store.get("k").await else {
            return;
        };
        assert_eq!(got.as_deref(), Some("v1"));

        let set = store.set("k", "v2").await;
        assert!(set.is_ok(), "set failed: {set:?}");
        let Ok(got) = store.get("k").await else {
            return;
        };
        assert_eq!(got.as_deref(), Some("v2"));

        let removed = store.remove("k").await;
        assert!(removed.is_ok(), "remove failed: {removed:?}");
        let got = store.get("k").await;
        assert!(matches!(got, Ok(None)), "unexpected result: {got:?}");
    }

    #[test]
    fn persisted_cache_shape() {
        let persisted = PersistedDomainCache {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        };
        let json_res = serde_json::to_string(&persisted);
        assert!(json_res.is_ok(), "serde_json::to_string failed: {json_res:?}");
        let Ok(json) = json_res else {
            return;
        };
        assert!(json.contains("\"version\":1"));
    }
}
