//! Gateway boundary library for DNS Console.
//!
//! Defines the request/response contract between the coordination layer and
//! the opaque backend: the domain model ([`types`]), the error taxonomy
//! ([`error`]) and the [`DnsGateway`] call surface. Every backend operation
//! is one named call returning a tagged success/failure envelope; there is
//! no streaming and no partial response.

pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::{GatewayError, Result};
pub use traits::DnsGateway;
pub use types::{
    Account, AccountStatus, BatchDeleteFailure, BatchDeleteRequest, BatchDeleteResult,
    CreateDnsRecordRequest, DnsRecord, DnsRecordType, Domain, DomainStatus, Envelope,
    PaginatedResponse, PaginationParams, ProviderType, RecordData, RecordQueryParams,
    UpdateDnsRecordRequest, TTL_AUTO,
};
