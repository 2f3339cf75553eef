//! Shared test fixtures: a scriptable mock gateway plus model factories.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use dns_console_gateway::{
    Account, BatchDeleteRequest, BatchDeleteResult, CreateDnsRecordRequest, DnsGateway, DnsRecord,
    Domain, DomainStatus, GatewayError, PaginatedResponse, PaginationParams, ProviderType,
    RecordData, RecordQueryParams, Result, UpdateDnsRecordRequest,
};

// ===== Model factories =====

pub fn account(id: &str) -> Account {
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

pub fn domain(id: &str, account_id: &str) -> Domain {
    Domain {
        id: id.to_string(),
        name: format!("{id}.example.com"),
        account_id: account_id.to_string(),
        provider: ProviderType::Cloudflare,
        status: DomainStatus::Active,
        record_count: None,
    }
}

pub fn record(id: &str, domain_id: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        domain_id: domain_id.to_string(),
        name: format!("host-{id}"),
        ttl: 600,
        data: RecordData::A {
            address: "1.2.3.4".to_string(),
        },
        proxied: None,
        created_at: None,
        updated_at: None,
    }
}

/// `n` domains named `{prefix}-1..=n`.
pub fn domains(prefix: &str, account_id: &str, n: usize) -> Vec<Domain> {
    (1..=n)
        .map(|i| domain(&format!("{prefix}-{i}"), account_id))
        .collect()
}

/// `n` records named `{prefix}-1..=n`.
pub fn records(prefix: &str, domain_id: &str, n: usize) -> Vec<DnsRecord> {
    (1..=n)
        .map(|i| record(&format!("{prefix}-{i}"), domain_id))
        .collect()
}

// ===== Hold gate =====

/// Releases a response that the mock gateway is holding back.
#[derive(Clone)]
pub struct Gate {
    sem: Arc<Semaphore>,
}

impl Gate {
    fn new() -> Self {
        Self {
            sem: Arc::new(Semaphore::new(0)),
        }
    }

    /// Let one held call proceed.
    pub fn release(&self) {
        self.sem.add_permits(1);
    }

    async fn pass(&self) {
        let permit = self.sem.acquire().await.expect("gate semaphore closed");
        permit.forget();
    }
}

// ===== Scriptable mock gateway =====

type DomainScript = HashMap<(String, u32), Result<PaginatedResponse<Domain>>>;
type RecordScript = HashMap<(String, u32), Result<PaginatedResponse<DnsRecord>>>;

/// Mock `DnsGateway` with scripted responses, call logs and hold gates.
///
/// Unscripted list calls fail with a distinctive backend error so a test
/// never passes by accident; the call logs are the authoritative check for
/// no-op guarantees.
#[derive(Default)]
pub struct MockGateway {
    accounts: Mutex<Vec<Account>>,
    domain_pages: Mutex<DomainScript>,
    record_pages: Mutex<RecordScript>,

    create_error: Mutex<Option<GatewayError>>,
    update_error: Mutex<Option<GatewayError>>,
    delete_error: Mutex<Option<GatewayError>>,
    batch_result: Mutex<Option<Result<BatchDeleteResult>>>,

    domain_holds: Mutex<HashMap<String, Gate>>,
    record_holds: Mutex<HashMap<String, Gate>>,

    pub domain_call_log: Mutex<Vec<(String, u32)>>,
    pub record_call_log: Mutex<Vec<(String, RecordQueryParams)>>,
    pub account_list_calls: Mutex<usize>,
    pub delete_call_log: Mutex<Vec<String>>,
    pub batch_call_log: Mutex<Vec<BatchDeleteRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_accounts(&self, accounts: Vec<Account>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn set_domain_page(
        &self,
        account_id: &str,
        page: u32,
        response: Result<PaginatedResponse<Domain>>,
    ) {
        self.domain_pages
            .lock()
            .unwrap()
            .insert((account_id.to_string(), page), response);
    }

    pub fn set_record_page(
        &self,
        domain_id: &str,
        page: u32,
        response: Result<PaginatedResponse<DnsRecord>>,
    ) {
        self.record_pages
            .lock()
            .unwrap()
            .insert((domain_id.to_string(), page), response);
    }

    pub fn fail_next_create(&self, error: GatewayError) {
        *self.create_error.lock().unwrap() = Some(error);
    }

    pub fn fail_next_update(&self, error: GatewayError) {
        *self.update_error.lock().unwrap() = Some(error);
    }

    pub fn fail_next_delete(&self, error: GatewayError) {
        *self.delete_error.lock().unwrap() = Some(error);
    }

    pub fn set_batch_result(&self, result: Result<BatchDeleteResult>) {
        *self.batch_result.lock().unwrap() = Some(result);
    }

    /// Hold every `list_domains` reply for `account_id` until released.
    pub fn hold_domains(&self, account_id: &str) -> Gate {
        let gate = Gate::new();
        self.domain_holds
            .lock()
            .unwrap()
            .insert(account_id.to_string(), gate.clone());
        gate
    }

    /// Hold every `list_records` reply for `domain_id` until released.
    pub fn hold_records(&self, domain_id: &str) -> Gate {
        let gate = Gate::new();
        self.record_holds
            .lock()
            .unwrap()
            .insert(domain_id.to_string(), gate.clone());
        gate
    }

    pub fn domain_calls_for(&self, account_id: &str) -> usize {
        self.domain_call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == account_id)
            .count()
    }

    pub fn record_calls_for(&self, domain_id: &str) -> usize {
        self.record_call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == domain_id)
            .count()
    }

    fn unscripted(what: &str) -> GatewayError {
        GatewayError::Backend {
            code: "unscripted".to_string(),
            message: format!("no scripted response for {what}"),
        }
    }
}

#[async_trait]
impl DnsGateway for MockGateway {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        *self.account_list_calls.lock().unwrap() += 1;
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn list_domains(
        &self,
        account_id: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<Domain>> {
        self.domain_call_log
            .lock()
            .unwrap()
            .push((account_id.to_string(), params.page));

        let gate = self.domain_holds.lock().unwrap().get(account_id).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        self.domain_pages
            .lock()
            .unwrap()
            .get(&(account_id.to_string(), params.page))
            .cloned()
            .unwrap_or_else(|| Err(Self::unscripted(&format!("domains {account_id} p{}", params.page))))
    }

    async fn list_records(
        &self,
        _account_id: &str,
        domain_id: &str,
        params: &RecordQueryParams,
    ) -> Result<PaginatedResponse<DnsRecord>> {
        self.record_call_log
            .lock()
            .unwrap()
            .push((domain_id.to_string(), params.clone()));

        let gate = self.record_holds.lock().unwrap().get(domain_id).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }

        self.record_pages
            .lock()
            .unwrap()
            .get(&(domain_id.to_string(), params.page))
            .cloned()
            .unwrap_or_else(|| Err(Self::unscripted(&format!("records {domain_id} p{}", params.page))))
    }

    async fn create_record(
        &self,
        _account_id: &str,
        request: &CreateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        if let Some(e) = self.create_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(DnsRecord {
            id: format!("created-{}", request.name),
            domain_id: request.domain_id.clone(),
            name: request.name.clone(),
            ttl: request.ttl,
            data: request.data.clone(),
            proxied: request.proxied,
            created_at: None,
            updated_at: None,
        })
    }

    async fn update_record(
        &self,
        _account_id: &str,
        record_id: &str,
        request: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        if let Some(e) = self.update_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(DnsRecord {
            id: record_id.to_string(),
            domain_id: request.domain_id.clone(),
            name: request.name.clone(),
            ttl: request.ttl,
            data: request.data.clone(),
            proxied: request.proxied,
            created_at: None,
            updated_at: None,
        })
    }

    async fn delete_record(
        &self,
        _account_id: &str,
        record_id: &str,
        _domain_id: &str,
    ) -> Result<()> {
        self.delete_call_log
            .lock()
            .unwrap()
            .push(record_id.to_string());
        if let Some(e) = self.delete_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(())
    }

    async fn batch_delete_records(
        &self,
        _account_id: &str,
        request: &BatchDeleteRequest,
    ) -> Result<BatchDeleteResult> {
        self.batch_call_log.lock().unwrap().push(request.clone());
        if let Some(result) = self.batch_result.lock().unwrap().take() {
            return result;
        }
        // Default: everything succeeds
        Ok(BatchDeleteResult {
            success_count: request.record_ids.len(),
            failed_count: 0,
            failures: Vec::new(),
        })
    }
}

// ===== Counting cache store =====

/// `CacheStore` wrapper that counts writes, for persistence-policy tests.
#[derive(Default)]
pub struct CountingStore {
    inner: dns_console_core::InMemoryCacheStore,
    pub set_calls: Mutex<usize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sets(&self) -> usize {
        *self.set_calls.lock().unwrap()
    }
}

#[async_trait]
impl dns_console_core::CacheStore for CountingStore {
    async fn get(&self, key: &str) -> dns_console_core::CoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> dns_console_core::CoreResult<()> {
        *self.set_calls.lock().unwrap() += 1;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> dns_console_core::CoreResult<()> {
        self.inner.remove(key).await
    }
}

/// A create request for an A record named `name`.
pub fn create_request(domain_id: &str, name: &str) -> CreateDnsRecordRequest {
    CreateDnsRecordRequest {
        domain_id: domain_id.to_string(),
        name: name.to_string(),
        ttl: 600,
        data: RecordData::A {
            address: "5.6.7.8".to_string(),
        },
        proxied: None,
    }
}

/// An update request moving a record to a new address.
pub fn update_request(domain_id: &str, name: &str) -> UpdateDnsRecordRequest {
    UpdateDnsRecordRequest {
        domain_id: domain_id.to_string(),
        name: name.to_string(),
        ttl: 300,
        data: RecordData::A {
            address: "9.9.9.9".to_string(),
        },
        proxied: None,
    }
}

/// Let spawned tasks run up to their next suspension point.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
