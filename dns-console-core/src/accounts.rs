//! Read-only account mirror.
//!
//! Accounts are owned by the backend; this directory only mirrors the list
//! so the UI and the coordinators can read account status without a round
//! trip. The domain cache coordinator asks for a refresh when a fetch fails
//! with a credential error, so updated status/error fields become visible —
//! the one deliberate coupling point between coordinators.

use std::sync::Arc;

use tokio::sync::RwLock;

use dns_console_gateway::{Account, DnsGateway};

#[derive(Default)]
struct DirectoryState {
    accounts: Vec<Account>,
    refreshing: bool,
}

/// Mirror of the backend account list.
pub struct AccountDirectory {
    gateway: Arc<dyn DnsGateway>,
    state: RwLock<DirectoryState>,
}

impl AccountDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new(gateway: Arc<dyn DnsGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(DirectoryState::default()),
        }
    }

    /// Fetch the account list and replace the mirror.
    ///
    /// Single-flight: a refresh issued while another is in flight is a
    /// silent no-op. Failures leave the previous mirror untouched and are
    /// logged, never surfaced — a stale account list is still useful.
    pub async fn refresh(&self) {
        {
            let mut state = self.state.write().await;
            if state.refreshing {
                return;
            }
            state.refreshing = true;
        }

        let result = self.gateway.list_accounts().await;

        let mut state = self.state.write().await;
        state.refreshing = false;
        match result {
            Ok(accounts) => {
                state.accounts = accounts;
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Account list refresh failed: {e}");
                } else {
                    log::error!("Account list refresh failed: {e}");
                }
            }
        }
    }

    /// Snapshot of all mirrored accounts.
    pub async fn accounts(&self) -> Vec<Account> {
        self.state.read().await.accounts.clone()
    }

    /// Look up one account by ID.
    pub async fn get(&self, account_id: &str) -> Option<Account> {
        self.state
            .read()
            .await
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
    }

    /// Whether a refresh is currently in flight.
    pub async fn is_refreshing(&self) -> bool {
        self.state.read().await.refreshing
    }
}
