use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Account, BatchDeleteRequest, BatchDeleteResult, CreateDnsRecordRequest, DnsRecord, Domain,
    PaginatedResponse, PaginationParams, RecordQueryParams, UpdateDnsRecordRequest,
};

/// The opaque request/response channel to the backend.
///
/// Every coordinator operation maps to exactly one named call on this trait;
/// responses are complete (no streaming, no partial results). Implementations
/// wrap whatever transport actually exists — an IPC bridge, an HTTP client,
/// an in-process service — and are free to retry internally, but the
/// coordination layer never retries on its own.
///
/// There is no cancellation surface: a coordinator that loses interest in a
/// response simply discards it on arrival.
#[async_trait]
pub trait DnsGateway: Send + Sync {
    /// List all configured accounts with their current status.
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// List domains of an account (paginated).
    async fn list_domains(
        &self,
        account_id: &str,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<Domain>>;

    /// List DNS records of a domain (paginated, searchable, filterable).
    async fn list_records(
        &self,
        account_id: &str,
        domain_id: &str,
        params: &RecordQueryParams,
    ) -> Result<PaginatedResponse<DnsRecord>>;

    /// Create a DNS record.
    async fn create_record(
        &self,
        account_id: &str,
        request: &CreateDnsRecordRequest,
    ) -> Result<DnsRecord>;

    /// Update a DNS record.
    async fn update_record(
        &self,
        account_id: &str,
        record_id: &str,
        request: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord>;

    /// Delete a DNS record.
    async fn delete_record(&self, account_id: &str, record_id: &str, domain_id: &str)
    -> Result<()>;

    /// Delete several DNS records in one call.
    ///
    /// Per-record failures do not fail the call: the result carries a failure
    /// list alongside the success count.
    async fn batch_delete_records(
        &self,
        account_id: &str,
        request: &BatchDeleteRequest,
    ) -> Result<BatchDeleteResult>;
}
