//! Cache coordinators
//!
//! The two stateful units of the coordination layer. Both own their state
//! exclusively behind a lock, issue gateway calls as their sole suspension
//! point, and gate every response commit on a freshness check so that a
//! response arriving for an abandoned target is silently dropped.

mod domain_cache;
mod record_list;

pub use domain_cache::{DomainCacheCoordinator, DOMAIN_PAGE_SIZE};
pub use record_list::{RecordListCoordinator, RECORD_PAGE_SIZE};
