//! Toolbox query history.
//!
//! A capped, most-recent-first ring of past toolbox queries (whois, DNS
//! lookup, IP lookup, SSL check), deduplicated by `(kind, query, record
//! type)`. Repeating a query refreshes its timestamp and moves it to the
//! front without growing the list. Persisted best-effort between sessions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::store::{CacheStore, PersistedQueryHistory, CACHE_VERSION, QUERY_HISTORY_KEY};
use crate::types::DnsRecordType;

/// Maximum number of history items kept.
pub const QUERY_HISTORY_CAP: usize = 50;

/// Which toolbox tool a history item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// WHOIS lookup.
    Whois,
    /// DNS resolution lookup.
    Dns,
    /// IP geolocation lookup.
    Ip,
    /// SSL certificate check.
    Ssl,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Whois => write!(f, "whois"),
            Self::Dns => write!(f, "dns"),
            Self::Ip => write!(f, "ip"),
            Self::Ssl => write!(f, "ssl"),
        }
    }
}

/// One remembered toolbox query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryHistoryItem {
    /// Item ID (UUID), stable across timestamp refreshes.
    pub id: String,
    /// Which tool ran the query.
    pub kind: QueryKind,
    /// The query string (domain, IP, hostname).
    pub query: String,
    /// Record type hint for DNS lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<DnsRecordType>,
    /// When the query was last run.
    pub queried_at: DateTime<Utc>,
}

impl QueryHistoryItem {
    fn same_query(&self, kind: QueryKind, query: &str, record_type: Option<&DnsRecordType>) -> bool {
        self.kind == kind && self.query == query && self.record_type.as_ref() == record_type
    }
}

/// The in-memory history ring. Pure state, unit-testable without a store.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    items: Vec<QueryHistoryItem>,
    cap: usize,
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::with_cap(QUERY_HISTORY_CAP)
    }
}

impl QueryHistory {
    /// Create an empty history with a custom capacity.
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    /// Rebuild from persisted items, enforcing the cap.
    #[must_use]
    pub fn from_items(mut items: Vec<QueryHistoryItem>, cap: usize) -> Self {
        items.truncate(cap);
        Self { items, cap }
    }

    /// Record a query.
    ///
    /// A query identical in `(kind, query, record_type)` to an existing item
    /// refreshes that item's timestamp and moves it to the front, keeping its
    /// ID. A new query is inserted at the front; the oldest item is evicted
    /// once the cap is exceeded.
    pub fn push(&mut self, kind: QueryKind, query: &str, record_type: Option<DnsRecordType>) {
        if let Some(pos) = self
            .items
            .iter()
            .position(|item| item.same_query(kind, query, record_type.as_ref()))
        {
            let mut item = self.items.remove(pos);
            item.queried_at = Utc::now();
            self.items.insert(0, item);
            return;
        }

        self.items.insert(
            0,
            QueryHistoryItem {
                id: uuid::Uuid::new_v4().to_string(),
                kind,
                query: query.to_string(),
                record_type,
                queried_at: Utc::now(),
            },
        );
        self.items.truncate(self.cap);
    }

    /// Items, most recent first.
    #[must_use]
    pub fn items(&self) -> &[QueryHistoryItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Query history with durable persistence.
///
/// Wraps [`QueryHistory`] behind a lock and mirrors every change to the
/// cache store. Store failures are logged, never surfaced.
pub struct QueryHistoryLog {
    store: Arc<dyn CacheStore>,
    state: RwLock<QueryHistory>,
}

impl QueryHistoryLog {
    /// Create an empty log backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            state: RwLock::new(QueryHistory::default()),
        }
    }

    /// Load persisted history, replacing the in-memory ring.
    ///
    /// Unreadable or version-mismatched payloads degrade to an empty history.
    pub async fn hydrate(&self) {
        let raw = match self.store.get(QUERY_HISTORY_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Failed to load query history: {e}");
                return;
            }
        };
        let persisted: PersistedQueryHistory = match serde_json::from_str(&raw) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Discarding unreadable query history: {e}");
                return;
            }
        };
        if persisted.version != CACHE_VERSION {
            log::warn!(
                "Discarding query history with version {} (expected {CACHE_VERSION})",
                persisted.version
            );
            return;
        }
        *self.state.write().await = QueryHistory::from_items(persisted.items, QUERY_HISTORY_CAP);
    }

    /// Record a query and persist the updated ring.
    pub async fn record(&self, kind: QueryKind, query: &str, record_type: Option<DnsRecordType>) {
        {
            let mut state = self.state.write().await;
            state.push(kind, query, record_type);
        }
        self.persist().await;
    }

    /// Items, most recent first.
    pub async fn items(&self) -> Vec<QueryHistoryItem> {
        self.state.read().await.items().to_vec()
    }

    /// Drop all items and the durable copy.
    pub async fn clear(&self) {
        self.state.write().await.clear();
        if let Err(e) = self.store.remove(QUERY_HISTORY_KEY).await {
            log::warn!("Failed to remove persisted query history: {e}");
        }
    }

    async fn persist(&self) {
        let payload = {
            let state = self.state.read().await;
            PersistedQueryHistory {
                version: CACHE_VERSION,
                items: state.items().to_vec(),
            }
        };
        match serde_json::to_string(&payload) {
            Ok(json) => {
                if let Err(e) = self.store.set(QUERY_HISTORY_KEY, &json).await {
                    log::warn!("Failed to persist query history: {e}");
                }
            }
            Err(e) => log::warn!("Failed to serialize query history: {e}"),
        }
    }
}
