//! Platform-agnostic application bootstrap for DNS Console.
//!
//! Provides `AppState` (coordinator container), `AppStateBuilder` (adapter
//! injection) and the durable cache store adapters. Every frontend constructs
//! one `AppState` at startup, runs the startup sequence, and dispatches all
//! domain/record operations through it.

pub mod adapters;

use std::sync::Arc;

use dns_console_core::{
    AccountDirectory, CacheStore, CoreError, CoreResult, DnsGateway, DomainCacheCoordinator,
    InMemoryCacheStore, QueryHistoryLog, RecordListCoordinator,
};

/// Platform-agnostic application state.
///
/// Holds the account mirror, both cache coordinators and the query history,
/// all wired around one gateway and one cache store.
pub struct AppState {
    /// Read-only account mirror
    pub accounts: Arc<AccountDirectory>,
    /// Per-account domain cache
    pub domain_cache: Arc<DomainCacheCoordinator>,
    /// Current-domain record list
    pub record_list: Arc<RecordListCoordinator>,
    /// Toolbox query history
    pub query_history: Arc<QueryHistoryLog>,
}

impl AppState {
    /// Run the startup sequence: hydrate persisted caches, then mirror the
    /// account list.
    ///
    /// Hydration failures degrade to empty state with a warning; this never
    /// fails the launch.
    pub async fn run_startup(&self) {
        self.domain_cache.hydrate().await;
        self.query_history.hydrate().await;
        self.accounts.refresh().await;
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `gateway` — the backend request channel
///
/// # Optional
/// - `cache_store` — defaults to `InMemoryCacheStore` (no durable cache)
pub struct AppStateBuilder {
    gateway: Option<Arc<dyn DnsGateway>>,
    cache_store: Option<Arc<dyn CacheStore>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            gateway: None,
            cache_store: None,
        }
    }

    #[must_use]
    pub fn gateway(mut self, gateway: Arc<dyn DnsGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    #[must_use]
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let gateway = self
            .gateway
            .ok_or_else(|| CoreError::ValidationError("gateway is required".to_string()))?;
        let cache_store = self
            .cache_store
            .unwrap_or_else(|| Arc::new(InMemoryCacheStore::new()));

        let accounts = Arc::new(AccountDirectory::new(Arc::clone(&gateway)));
        let domain_cache = Arc::new(DomainCacheCoordinator::new(
            Arc::clone(&gateway),
            Arc::clone(&cache_store),
            Arc::clone(&accounts),
        ));
        let record_list = Arc::new(RecordListCoordinator::new(Arc::clone(&gateway)));
        let query_history = Arc::new(QueryHistoryLog::new(cache_store));

        Ok(AppState {
            accounts,
            domain_cache,
            record_list,
            query_history,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
