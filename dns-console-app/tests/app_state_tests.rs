#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for `AppStateBuilder`, the startup sequence and the
//! JSON file cache store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dns_console_app::adapters::JsonFileCacheStore;
use dns_console_app::AppStateBuilder;
use dns_console_core::{CacheStore, CoreError};
use dns_console_gateway::{
    Account, BatchDeleteRequest, BatchDeleteResult, CreateDnsRecordRequest, DnsGateway, DnsRecord,
    Domain, DomainStatus, GatewayError, PaginatedResponse, PaginationParams, ProviderType,
    RecordQueryParams, Result as GatewayResult, UpdateDnsRecordRequest,
};

// ===== Mock gateway =====

/// Minimal gateway mock: a fixed account list and one page of domains per
/// account.
#[derive(Default)]
struct StubGateway {
    accounts: Vec<Account>,
    domains: Vec<Domain>,
    list_account_calls: Mutex<usize>,
}

impl StubGateway {
    fn with_accounts(accounts: Vec<Account>) -> Self {
        Self {
            accounts,
            ..Self::default()
        }
    }

    fn with_domains(mut self, domains: Vec<Domain>) -> Self {
        self.domains = domains;
        self
    }
}

#[async_trait]
impl DnsGateway for StubGateway {
    async fn list_accounts(&self) -> GatewayResult<Vec<Account>> {
        *self.list_account_calls.lock().unwrap() += 1;
        Ok(self.accounts.clone())
    }

    async fn list_domains(
        &self,
        account_id: &str,
        params: &PaginationParams,
    ) -> GatewayResult<PaginatedResponse<Domain>> {
        let items: Vec<Domain> = self
            .domains
            .iter()
            .filter(|d| d.account_id == account_id)
            .cloned()
            .collect();
        let total = u32::try_from(items.len()).unwrap_or(u32::MAX);
        Ok(PaginatedResponse::new(
            items,
            params.page,
            params.page_size,
            total,
        ))
    }

    async fn list_records(
        &self,
        _account_id: &str,
        _domain_id: &str,
        params: &RecordQueryParams,
    ) -> GatewayResult<PaginatedResponse<DnsRecord>> {
        Ok(PaginatedResponse::new(
            Vec::new(),
            params.page,
            params.page_size,
            0,
        ))
    }

    async fn create_record(
        &self,
        _account_id: &str,
        _request: &CreateDnsRecordRequest,
    ) -> GatewayResult<DnsRecord> {
        Err(GatewayError::Backend {
            code: "unsupported".to_string(),
            message: "not exercised by these tests".to_string(),
        })
    }

    async fn update_record(
        &self,
        _account_id: &str,
        _record_id: &str,
        _request: &UpdateDnsRecordRequest,
    ) -> GatewayResult<DnsRecord> {
        Err(GatewayError::Backend {
            code: "unsupported".to_string(),
            message: "not exercised by these tests".to_string(),
        })
    }

    async fn delete_record(
        &self,
        _account_id: &str,
        _record_id: &str,
        _domain_id: &str,
    ) -> GatewayResult<()> {
        Ok(())
    }

    async fn batch_delete_records(
        &self,
        _account_id: &str,
        request: &BatchDeleteRequest,
    ) -> GatewayResult<BatchDeleteResult> {
        Ok(BatchDeleteResult {
            success_count: request.record_ids.len(),
            failed_count: 0,
            failures: Vec::new(),
        })
    }
}

fn account(id: &str) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Account {id}"),
        provider: ProviderType::Cloudflare,
        status: None,
        error: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

fn domain(id: &str, account_id: &str) -> Domain {
    Domain {
        id: id.to_string(),
        name: format!("{id}.example.com"),
        account_id: account_id.to_string(),
        provider: ProviderType::Cloudflare,
        status: DomainStatus::Active,
        record_count: None,
    }
}

// ===== AppStateBuilder =====

#[tokio::test]
async fn builder_with_gateway_succeeds() {
    let result = AppStateBuilder::new()
        .gateway(Arc::new(StubGateway::default()))
        .build();
    assert!(result.is_ok());
}

#[tokio::test]
async fn builder_missing_gateway_fails() {
    let result = AppStateBuilder::new().build();
    match result {
        Err(CoreError::ValidationError(msg)) => assert!(msg.contains("gateway")),
        Err(other) => panic!("Expected ValidationError, got: {other:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[tokio::test]
async fn builder_default_cache_store_works() {
    let gateway = Arc::new(
        StubGateway::with_accounts(vec![account("acc-1")])
            .with_domains(vec![domain("dom-1", "acc-1")]),
    );
    let app_state = AppStateBuilder::new().gateway(gateway).build().unwrap();

    app_state.domain_cache.refresh_account("acc-1").await.unwrap();
    assert_eq!(app_state.domain_cache.domains_for("acc-1").await.len(), 1);
}

// ===== Startup sequence =====

#[tokio::test]
async fn startup_refreshes_account_mirror() {
    let gateway = Arc::new(StubGateway::with_accounts(vec![
        account("acc-1"),
        account("acc-2"),
    ]));
    let app_state = AppStateBuilder::new()
        .gateway(Arc::clone(&gateway) as Arc<dyn DnsGateway>)
        .build()
        .unwrap();

    assert!(app_state.accounts.accounts().await.is_empty());
    app_state.run_startup().await;

    assert_eq!(app_state.accounts.accounts().await.len(), 2);
    assert_eq!(*gateway.list_account_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn startup_hydrates_domain_cache_from_previous_session() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let cache_path = tmp.path().join("cache.json");

    let gateway = Arc::new(
        StubGateway::with_accounts(vec![account("acc-1")])
            .with_domains(vec![domain("dom-1", "acc-1"), domain("dom-2", "acc-1")]),
    );

    // First session fetches and persists
    {
        let store = Arc::new(JsonFileCacheStore::new(&cache_path).await.unwrap());
        let app_state = AppStateBuilder::new()
            .gateway(Arc::clone(&gateway) as Arc<dyn DnsGateway>)
            .cache_store(store)
            .build()
            .unwrap();
        app_state.domain_cache.refresh_account("acc-1").await.unwrap();
    }

    // Second session starts cold and restores the cache on startup
    let store = Arc::new(JsonFileCacheStore::new(&cache_path).await.unwrap());
    let app_state = AppStateBuilder::new()
        .gateway(Arc::clone(&gateway) as Arc<dyn DnsGateway>)
        .cache_store(store)
        .build()
        .unwrap();

    assert!(app_state.domain_cache.domains_for("acc-1").await.is_empty());
    app_state.run_startup().await;
    assert_eq!(app_state.domain_cache.domains_for("acc-1").await.len(), 2);
}

// ===== JsonFileCacheStore =====

#[tokio::test]
async fn file_store_roundtrip_and_reopen() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("cache.json");

    let store = JsonFileCacheStore::new(&path).await.unwrap();
    assert!(store.get("k").await.unwrap().is_none());

    store.set("k", "v1").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));
    assert!(path.exists());

    // A fresh instance over the same path sees the persisted value
    let store2 = JsonFileCacheStore::new(&path).await.unwrap();
    assert_eq!(store2.get("k").await.unwrap().as_deref(), Some("v1"));

    store2.remove("k").await.unwrap();
    let store3 = JsonFileCacheStore::new(&path).await.unwrap();
    assert!(store3.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn file_store_creates_parent_directories() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("nested").join("deep").join("cache.json");

    let store = JsonFileCacheStore::new(&path).await.unwrap();
    store.set("k", "v").await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn file_store_corruption_degrades_to_empty() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("cache.json");

    tokio::fs::write(&path, b"not valid json!!!").await.unwrap();

    let store = JsonFileCacheStore::new(&path).await.unwrap();
    assert!(store.get("k").await.unwrap().is_none());

    // The store stays usable after recovery
    store.set("k", "v").await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn file_store_version_mismatch_starts_empty() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("cache.json");

    tokio::fs::write(&path, br#"{"version": 99, "entries": {"k": "v"}}"#)
        .await
        .unwrap();

    let store = JsonFileCacheStore::new(&path).await.unwrap();
    assert!(store.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn file_store_rapid_writes_keep_last_value() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("cache.json");

    let store = JsonFileCacheStore::new(&path).await.unwrap();
    for i in 0..10 {
        store.set("k", &format!("v{i}")).await.unwrap();
    }

    let store2 = JsonFileCacheStore::new(&path).await.unwrap();
    assert_eq!(store2.get("k").await.unwrap().as_deref(), Some("v9"));
}
