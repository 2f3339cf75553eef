//! Core layer type definitions
//!
//! Cache entries, coordinator snapshots and history items. Gateway boundary
//! types are re-exported so frontends depend on this crate alone.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export the gateway library's public types
pub use dns_console_gateway::{
    Account, AccountStatus, BatchDeleteFailure, BatchDeleteRequest, BatchDeleteResult,
    CreateDnsRecordRequest, DnsRecord, DnsRecordType, Domain, DomainStatus, Envelope,
    PaginatedResponse, PaginationParams, ProviderType, RecordData, RecordQueryParams,
    UpdateDnsRecordRequest, TTL_AUTO,
};

/// One account's cached domain list.
///
/// Created on the first successful page-1 fetch, replaced wholesale on
/// refresh. Further pages are appended in page order by simple concatenation;
/// the backend is trusted to return disjoint pages, so no deduplication
/// happens here. `has_more == false` is terminal until an explicit refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDomainCache {
    /// Cached domains, in fetch order.
    pub domains: Vec<Domain>,
    /// Highest page fetched so far (1-indexed).
    pub page: u32,
    /// Whether more pages exist after [`page`](Self::page).
    pub has_more: bool,
    /// When this entry was last replaced or extended.
    pub updated_at: DateTime<Utc>,
}

impl AccountDomainCache {
    /// Build a fresh entry from a page-1 response.
    #[must_use]
    pub fn from_page(page: PaginatedResponse<Domain>) -> Self {
        Self {
            domains: page.items,
            page: page.page,
            has_more: page.has_more,
            updated_at: Utc::now(),
        }
    }

    /// Append a follow-up page, advancing the pagination cursor.
    pub fn append_page(&mut self, page: PaginatedResponse<Domain>) {
        self.domains.extend(page.items);
        self.page = page.page;
        self.has_more = page.has_more;
        self.updated_at = Utc::now();
    }
}

/// The (account, domain) pair a record list belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordTarget {
    /// Owning account ID.
    pub account_id: String,
    /// Domain ID the list was fetched for.
    pub domain_id: String,
}

impl RecordTarget {
    /// Create a new record target.
    #[must_use]
    pub fn new(account_id: &str, domain_id: &str) -> Self {
        Self {
            account_id: account_id.to_string(),
            domain_id: domain_id.to_string(),
        }
    }

    /// Whether this target points at the given pair.
    #[must_use]
    pub fn matches(&self, account_id: &str, domain_id: &str) -> bool {
        self.account_id == account_id && self.domain_id == domain_id
    }
}

/// Point-in-time view of the record list coordinator, safe to render from.
#[derive(Debug, Clone)]
pub struct RecordListSnapshot {
    /// Loaded records (the accumulated page window).
    pub records: Vec<DnsRecord>,
    /// Which (account, domain) the list belongs to, if any.
    pub target: Option<RecordTarget>,
    /// First-page fetch in flight.
    pub loading: bool,
    /// Next-page fetch in flight.
    pub loading_more: bool,
    /// Single delete in flight.
    pub deleting: bool,
    /// Batch delete in flight.
    pub batch_deleting: bool,
    /// Highest page fetched (0 before the first successful fetch).
    pub page: u32,
    /// Whether more pages exist.
    pub has_more: bool,
    /// Total record count reported by the backend.
    pub total_count: u32,
    /// Active search keyword.
    pub keyword: Option<String>,
    /// Active record type filter.
    pub record_type: Option<DnsRecordType>,
    /// IDs selected for batch operations.
    pub selected: HashSet<String>,
    /// Whether batch-selection mode is active.
    pub select_mode: bool,
    /// Error message from the last failed first-page fetch.
    pub error: Option<String>,
}
