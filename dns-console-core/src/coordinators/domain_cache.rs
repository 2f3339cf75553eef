//! Per-account domain cache coordination.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::RwLock;

use dns_console_gateway::{Account, DnsGateway, Domain, PaginationParams};

use crate::accounts::AccountDirectory;
use crate::error::{CoreError, CoreResult};
use crate::store::{CacheStore, PersistedDomainCache, CACHE_VERSION, DOMAIN_CACHE_KEY};
use crate::types::AccountDomainCache;

/// Fixed page size for domain list fetches.
pub const DOMAIN_PAGE_SIZE: u32 = 20;

#[derive(Default)]
struct DomainCacheState {
    /// Cache entries keyed by account ID.
    entries: HashMap<String, AccountDomainCache>,
    /// Accounts with a first-page fetch in flight.
    loading: HashSet<String>,
    /// Accounts with a next-page fetch in flight.
    loading_more: HashSet<String>,
    /// Whether a background refresh of all accounts is running.
    refreshing_all: bool,
    /// Expanded account rows. Ephemeral: survives cache replacement, never
    /// persisted.
    expanded: HashSet<String>,
    /// Sidebar scroll position. Ephemeral.
    scroll_offset: usize,
}

/// Maintains, per account, a paginated and independently refreshable list of
/// domains, safe under concurrent account switches.
///
/// Writes are keyed by account ID, so a slow response for an account the user
/// has navigated away from lands harmlessly in that account's own cache
/// entry. The cache map is persisted best-effort after every successful
/// mutation; a failed fetch never clears pre-existing entries — stale data
/// beats an empty sidebar.
pub struct DomainCacheCoordinator {
    gateway: Arc<dyn DnsGateway>,
    store: Arc<dyn CacheStore>,
    accounts: Arc<AccountDirectory>,
    state: RwLock<DomainCacheState>,
}

impl DomainCacheCoordinator {
    /// Create a coordinator with an empty cache.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn DnsGateway>,
        store: Arc<dyn CacheStore>,
        accounts: Arc<AccountDirectory>,
    ) -> Self {
        Self {
            gateway,
            store,
            accounts,
            state: RwLock::new(DomainCacheState::default()),
        }
    }

    /// Load the persisted cache map into memory.
    ///
    /// Entries already fetched this session are never overwritten.
    /// Unreadable or version-mismatched payloads degrade to an empty cache.
    pub async fn hydrate(&self) {
        let raw = match self.store.get(DOMAIN_CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Failed to load domain cache: {e}");
                return;
            }
        };
        let persisted: PersistedDomainCache = match serde_json::from_str(&raw) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Discarding unreadable domain cache: {e}");
                return;
            }
        };
        if persisted.version != CACHE_VERSION {
            log::warn!(
                "Discarding domain cache with version {} (expected {CACHE_VERSION})",
                persisted.version
            );
            return;
        }
        let mut state = self.state.write().await;
        for (account_id, entry) in persisted.entries {
            state.entries.entry(account_id).or_insert(entry);
        }
    }

    /// Fetch page 1 for one account and replace its cache entry.
    ///
    /// Single-flight per account: a refresh issued while a first-page fetch
    /// for the same account is in flight is a silent no-op. On failure the
    /// existing entry is left untouched and the error propagates to the
    /// caller; a credential failure additionally triggers an account-list
    /// refresh so updated status fields become visible.
    pub async fn refresh_account(&self, account_id: &str) -> CoreResult<()> {
        {
            let mut state = self.state.write().await;
            if !state.loading.insert(account_id.to_string()) {
                return Ok(());
            }
        }

        let params = PaginationParams {
            page: 1,
            page_size: DOMAIN_PAGE_SIZE,
        };
        let result = self.gateway.list_domains(account_id, &params).await;

        let committed = {
            let mut state = self.state.write().await;
            state.loading.remove(account_id);
            match result {
                Ok(page) => {
                    state
                        .entries
                        .insert(account_id.to_string(), AccountDomainCache::from_page(page));
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };

        match committed {
            Ok(()) => {
                self.persist().await;
                Ok(())
            }
            Err(e) => {
                if e.is_credential_error() {
                    // 凭证失效，刷新账户列表以拿到更新后的状态字段
                    self.accounts.refresh().await;
                }
                Err(CoreError::Gateway(e))
            }
        }
    }

    /// Fetch page 1 for every given account in parallel (background sync).
    ///
    /// Single-flight globally. Each account's failure is isolated and only
    /// logged, so one bad account cannot block the others. The full cache
    /// map is persisted once after the batch, success or partial failure.
    pub async fn refresh_all_accounts(&self, accounts: &[Account]) {
        {
            let mut state = self.state.write().await;
            if state.refreshing_all {
                return;
            }
            state.refreshing_all = true;
        }

        let fetches: Vec<_> = accounts
            .iter()
            .map(|account| {
                let gateway = Arc::clone(&self.gateway);
                let account_id = account.id.clone();
                let params = PaginationParams {
                    page: 1,
                    page_size: DOMAIN_PAGE_SIZE,
                };
                async move {
                    let result = gateway.list_domains(&account_id, &params).await;
                    (account_id, result)
                }
            })
            .collect();

        let results = futures::future::join_all(fetches).await;

        {
            let mut state = self.state.write().await;
            for (account_id, result) in results {
                match result {
                    Ok(page) => {
                        state
                            .entries
                            .insert(account_id, AccountDomainCache::from_page(page));
                    }
                    Err(e) => {
                        if e.is_expected() {
                            log::warn!("Background domain sync failed for {account_id}: {e}");
                        } else {
                            log::error!("Background domain sync failed for {account_id}: {e}");
                        }
                    }
                }
            }
            state.refreshing_all = false;
        }

        self.persist().await;
    }

    /// Fetch the next page for one account and append it.
    ///
    /// No-op when there is no cache entry, no further page, or a load-more
    /// for this account is already in flight. Appends without deduplication
    /// (the backend returns disjoint pages). A failed continuation never
    /// disturbs the existing view: it is logged, not surfaced.
    pub async fn load_more_domains(&self, account_id: &str) {
        let next_page = {
            let mut state = self.state.write().await;
            let Some(entry) = state.entries.get(account_id) else {
                return;
            };
            if !entry.has_more || state.loading_more.contains(account_id) {
                return;
            }
            let next_page = entry.page + 1;
            state.loading_more.insert(account_id.to_string());
            next_page
        };

        let params = PaginationParams {
            page: next_page,
            page_size: DOMAIN_PAGE_SIZE,
        };
        let result = self.gateway.list_domains(account_id, &params).await;

        let committed = {
            let mut state = self.state.write().await;
            state.loading_more.remove(account_id);
            match result {
                Ok(page) => {
                    // 条目可能在请求期间被清除，此时丢弃响应
                    if let Some(entry) = state.entries.get_mut(account_id) {
                        entry.append_page(page);
                        true
                    } else {
                        log::debug!("Discarding load-more response for cleared account {account_id}");
                        false
                    }
                }
                Err(e) => {
                    if e.is_expected() {
                        log::warn!("Load more domains failed for {account_id}: {e}");
                    } else {
                        log::error!("Load more domains failed for {account_id}: {e}");
                    }
                    false
                }
            }
        };

        if committed {
            self.persist().await;
        }
    }

    /// Remove one account's cache entry.
    pub async fn clear_account_cache(&self, account_id: &str) {
        self.state.write().await.entries.remove(account_id);
        self.persist().await;
    }

    /// Remove every cache entry and the durable copy.
    pub async fn clear_all_cache(&self) {
        self.state.write().await.entries.clear();
        if let Err(e) = self.store.remove(DOMAIN_CACHE_KEY).await {
            log::warn!("Failed to remove persisted domain cache: {e}");
        }
    }

    // ===== Getters (pure projections, no side effects) =====

    /// Cached domains for an account, empty when nothing is cached.
    pub async fn domains_for(&self, account_id: &str) -> Vec<Domain> {
        self.state
            .read()
            .await
            .entries
            .get(account_id)
            .map(|entry| entry.domains.clone())
            .unwrap_or_default()
    }

    /// The full cache entry for an account, if present.
    pub async fn cache_entry(&self, account_id: &str) -> Option<AccountDomainCache> {
        self.state.read().await.entries.get(account_id).cloned()
    }

    /// Whether a first-page fetch is in flight for the account.
    pub async fn is_loading(&self, account_id: &str) -> bool {
        self.state.read().await.loading.contains(account_id)
    }

    /// Whether a next-page fetch is in flight for the account.
    pub async fn is_loading_more(&self, account_id: &str) -> bool {
        self.state.read().await.loading_more.contains(account_id)
    }

    /// Whether the account's cached list has further pages.
    pub async fn has_more(&self, account_id: &str) -> bool {
        self.state
            .read()
            .await
            .entries
            .get(account_id)
            .is_some_and(|entry| entry.has_more)
    }

    /// Whether a background refresh of all accounts is running.
    pub async fn is_refreshing_all(&self) -> bool {
        self.state.read().await.refreshing_all
    }

    /// Whether an account row is expanded in the sidebar.
    pub async fn is_expanded(&self, account_id: &str) -> bool {
        self.state.read().await.expanded.contains(account_id)
    }

    /// Toggle an account row's expansion. Ephemeral UI state, survives cache
    /// replacement.
    pub async fn toggle_expanded(&self, account_id: &str) {
        let mut state = self.state.write().await;
        if !state.expanded.remove(account_id) {
            state.expanded.insert(account_id.to_string());
        }
    }

    /// Remembered sidebar scroll position.
    pub async fn scroll_offset(&self) -> usize {
        self.state.read().await.scroll_offset
    }

    /// Remember the sidebar scroll position.
    pub async fn set_scroll_offset(&self, offset: usize) {
        self.state.write().await.scroll_offset = offset;
    }

    /// Persist the cache map, best-effort.
    async fn persist(&self) {
        let payload = {
            let state = self.state.read().await;
            PersistedDomainCache {
                version: CACHE_VERSION,
                entries: state.entries.clone(),
            }
        };
        match serde_json::to_string(&payload) {
            Ok(json) => {
                if let Err(e) = self.store.set(DOMAIN_CACHE_KEY, &json).await {
                    log::warn!("Failed to persist domain cache: {e}");
                }
            }
            Err(e) => log::warn!("Failed to serialize domain cache: {e}"),
        }
    }
}
