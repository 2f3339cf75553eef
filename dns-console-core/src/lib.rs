//! DNS Console core library.
//!
//! The client-side coordination layer between an opaque request gateway and
//! any UI frontend:
//! - per-account domain caches with incremental pagination and durable,
//!   best-effort persistence ([`DomainCacheCoordinator`])
//! - the single "current" DNS record list with search, filtering, optimistic
//!   mutation and batch-delete reconciliation ([`RecordListCoordinator`])
//! - a read-only account mirror ([`AccountDirectory`])
//! - a capped, deduplicated toolbox query history ([`QueryHistoryLog`])
//!
//! All coordinator state is owned exclusively by its coordinator and read
//! through getters; the gateway call is the sole suspension point, and every
//! response commit re-checks the coordinator's current target before
//! applying — a response for an abandoned target is silently dropped.

pub mod accounts;
pub mod coordinators;
pub mod error;
pub mod history;
pub mod store;
pub mod types;

// Re-export the gateway boundary so frontends can depend on this crate alone
pub use dns_console_gateway::{DnsGateway, GatewayError};

pub use accounts::AccountDirectory;
pub use coordinators::{DomainCacheCoordinator, RecordListCoordinator};
pub use error::{CoreError, CoreResult};
pub use history::{QueryHistory, QueryHistoryItem, QueryHistoryLog, QueryKind, QUERY_HISTORY_CAP};
pub use store::{CacheStore, InMemoryCacheStore};
