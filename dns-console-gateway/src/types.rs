use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// All list calls accept these parameters to control page-based pagination.
/// Pages are 1-indexed.
///
/// # Default
///
/// The default is `page = 1, page_size = 20`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl PaginationParams {
    /// Parameters for a specific page at the default page size.
    #[must_use]
    pub fn for_page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }
}

/// Query parameters for DNS record listing, with optional search and filtering.
///
/// Extends basic pagination with keyword search and record type filtering.
/// An absent `record_type` means "all types".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQueryParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
    /// Optional keyword to match against record names or values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Optional record type filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_type: Option<DnsRecordType>,
}

impl Default for RecordQueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            keyword: None,
            record_type: None,
        }
    }
}

impl RecordQueryParams {
    /// Clamp pagination values to valid ranges, preserving search fields.
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
            keyword: self.keyword.clone(),
            record_type: self.record_type.clone(),
        }
    }
}

/// A paginated response wrapper.
///
/// Returned by all list operations. Contains the current page of items
/// along with pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Page size used for this request.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_count: u32,
    /// Whether there are more pages after this one.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response, automatically computing
    /// [`has_more`](Self::has_more).
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u32) -> Self {
        let has_more = (page * page_size) < total_count;
        Self {
            items,
            page,
            page_size,
            total_count,
            has_more,
        }
    }
}

// ============ Provider & Account Types ============

/// Identifies which DNS provider backs an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Cloudflare DNS.
    Cloudflare,
    /// Aliyun (China) DNS.
    Aliyun,
    /// Tencent Cloud `DNSPod`.
    Dnspod,
    /// Huawei Cloud DNS.
    Huaweicloud,
}

impl ProviderType {
    /// Whether the provider supports edge proxying for individual records
    /// (Cloudflare's orange-cloud). The `proxied` flag on a record is only
    /// meaningful when this returns `true`.
    #[must_use]
    pub fn supports_proxy(self) -> bool {
        matches!(self, Self::Cloudflare)
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cloudflare => write!(f, "cloudflare"),
            Self::Aliyun => write!(f, "aliyun"),
            Self::Dnspod => write!(f, "dnspod"),
            Self::Huaweicloud => write!(f, "huaweicloud"),
        }
    }
}

/// Lifecycle status of an account's credential set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Credentials are usable.
    Active,
    /// Credentials failed validation (expired, revoked, etc.).
    Error,
}

/// A credential set bound to one provider.
///
/// Accounts are owned by the backend; the coordination layer only mirrors a
/// read-only list and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Account ID (UUID).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Which provider this account authenticates against.
    pub provider: ProviderType,
    /// Account status, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    /// Error detail when `status` is [`AccountStatus::Error`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the account was created.
    #[serde(rename = "createdAt")]
    #[serde(with = "crate::utils::datetime")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the account was last updated.
    #[serde(rename = "updatedAt")]
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// ============ Domain Types ============

/// Status of a domain/zone within a DNS provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// Domain is active and resolving.
    Active,
    /// Domain is paused (not resolving).
    Paused,
    /// Domain is pending activation/verification.
    Pending,
    /// Domain is in an error state.
    Error,
    /// Status could not be determined.
    Unknown,
}

/// A DNS zone belonging to one account.
///
/// A domain's `id` is unique within its owning account, not globally —
/// two accounts at different providers may well report the same zone ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    /// Provider-specific domain/zone identifier.
    pub id: String,
    /// Domain name (e.g., `"example.com"`).
    pub name: String,
    /// Owning account ID.
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// Which provider manages this domain.
    pub provider: ProviderType,
    /// Current domain status.
    pub status: DomainStatus,
    /// Number of DNS records in this domain, if known.
    #[serde(rename = "recordCount", skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u32>,
}

// ============ DNS Record Types ============

/// TTL sentinel meaning "let the provider choose" (Cloudflare convention).
pub const TTL_AUTO: u32 = 1;

/// DNS record type identifier, used for query filtering.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
/// The "all types" filter position is `Option<DnsRecordType>::None` on
/// [`RecordQueryParams`]; there is deliberately no `All` variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
    /// Reverse-lookup pointer record.
    Ptr,
    /// Start of authority record.
    Soa,
}

/// Type-safe representation of DNS record data.
///
/// Each variant carries the fields specific to that record type. Use
/// [`record_type()`](Self::record_type) to get the [`DnsRecordType`]
/// discriminant, or [`display_value()`](Self::display_value) for the primary
/// value to show in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content")]
pub enum RecordData {
    /// A record — maps a hostname to an IPv4 address.
    A {
        /// IPv4 address (e.g., `"1.2.3.4"`).
        address: String,
    },

    /// AAAA record — maps a hostname to an IPv6 address.
    AAAA {
        /// IPv6 address (e.g., `"2001:db8::1"`).
        address: String,
    },

    /// CNAME record — alias from one name to another.
    CNAME {
        /// Target hostname.
        target: String,
    },

    /// MX record — mail exchange server.
    MX {
        /// Priority (lower = preferred).
        priority: u16,
        /// Mail server hostname.
        exchange: String,
    },

    /// TXT record — arbitrary text data.
    TXT {
        /// Text content.
        text: String,
    },

    /// NS record — authoritative name server.
    NS {
        /// Name server hostname.
        nameserver: String,
    },

    /// SRV record — service locator.
    SRV {
        /// Priority (lower = preferred).
        priority: u16,
        /// Weight for load balancing among same-priority targets.
        weight: u16,
        /// TCP/UDP port number.
        port: u16,
        /// Target hostname providing the service.
        target: String,
    },

    /// CAA record — Certificate Authority Authorization.
    CAA {
        /// Issuer critical flag (0 or 128).
        flags: u8,
        /// Property tag (`"issue"`, `"issuewild"`, or `"iodef"`).
        tag: String,
        /// CA domain or reporting URI.
        value: String,
    },

    /// PTR record — reverse lookup pointer.
    PTR {
        /// Target hostname the address points back to.
        target: String,
    },

    /// SOA record — start of authority.
    SOA {
        /// Primary name server for the zone.
        mname: String,
        /// Mailbox of the zone administrator.
        rname: String,
    },
}

impl RecordData {
    /// Returns the [`DnsRecordType`] discriminant for this record data.
    pub fn record_type(&self) -> DnsRecordType {
        match self {
            Self::A { .. } => DnsRecordType::A,
            Self::AAAA { .. } => DnsRecordType::Aaaa,
            Self::CNAME { .. } => DnsRecordType::Cname,
            Self::MX { .. } => DnsRecordType::Mx,
            Self::TXT { .. } => DnsRecordType::Txt,
            Self::NS { .. } => DnsRecordType::Ns,
            Self::SRV { .. } => DnsRecordType::Srv,
            Self::CAA { .. } => DnsRecordType::Caa,
            Self::PTR { .. } => DnsRecordType::Ptr,
            Self::SOA { .. } => DnsRecordType::Soa,
        }
    }

    /// Returns the primary display value for this record (e.g., the address
    /// for A/AAAA, the target for CNAME/SRV/PTR, the exchange for MX).
    pub fn display_value(&self) -> &str {
        match self {
            Self::A { address } | Self::AAAA { address } => address,
            Self::CNAME { target } | Self::SRV { target, .. } | Self::PTR { target } => target,
            Self::MX { exchange, .. } => exchange,
            Self::TXT { text } => text,
            Self::NS { nameserver } => nameserver,
            Self::CAA { value, .. } => value,
            Self::SOA { mname, .. } => mname,
        }
    }
}

/// A DNS resource record as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Provider-specific record identifier.
    pub id: String,
    /// Domain/zone identifier this record belongs to.
    pub domain_id: String,
    /// Record name (e.g., `"www"` or `"@"` for apex).
    pub name: String,
    /// Time to live in seconds; [`TTL_AUTO`] means automatic.
    pub ttl: u32,
    /// Type-specific record data.
    pub data: RecordData,

    /// Whether edge proxying is enabled. Only meaningful when
    /// [`ProviderType::supports_proxy`] holds for the owning account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,

    /// When the record was created, if known.
    #[serde(with = "crate::utils::datetime::option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,

    /// When the record was last updated, if known.
    #[serde(with = "crate::utils::datetime::option")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl DnsRecord {
    /// Whether the record's TTL is the "automatic" sentinel.
    #[must_use]
    pub fn is_auto_ttl(&self) -> bool {
        self.ttl == TTL_AUTO
    }
}

/// Request to create a new DNS record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDnsRecordRequest {
    /// Domain/zone identifier to create the record in.
    pub domain_id: String,
    /// Record name (e.g., `"www"`).
    pub name: String,
    /// Time to live in seconds; [`TTL_AUTO`] means automatic.
    pub ttl: u32,
    /// Type-specific record data.
    pub data: RecordData,
    /// Enable edge proxying (proxy-capable providers only, ignored elsewhere).
    pub proxied: Option<bool>,
}

/// Request to update an existing DNS record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDnsRecordRequest {
    /// Domain/zone identifier the record belongs to.
    pub domain_id: String,
    /// New record name.
    pub name: String,
    /// New TTL in seconds.
    pub ttl: u32,
    /// New type-specific record data.
    pub data: RecordData,
    /// Enable edge proxying (proxy-capable providers only, ignored elsewhere).
    pub proxied: Option<bool>,
}

// ============ Batch Operation Types ============

/// Request to delete several DNS records of one domain in a single call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteRequest {
    /// Domain ID the records belong to.
    pub domain_id: String,
    /// Record IDs to delete.
    pub record_ids: Vec<String>,
}

/// Result of a batch delete operation.
///
/// A partial failure is not an error: the envelope is a success carrying a
/// per-record failure list. Callers reconcile local state by removing only
/// the IDs absent from [`failures`](Self::failures).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteResult {
    /// Number of records successfully deleted.
    pub success_count: usize,
    /// Number of records that failed to delete.
    pub failed_count: usize,
    /// Details about each failed deletion.
    pub failures: Vec<BatchDeleteFailure>,
}

/// Information about a single failed record deletion in a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteFailure {
    /// ID of the record that failed to delete.
    pub record_id: String,
    /// Human-readable reason for the failure.
    pub reason: String,
}

// ============ Response Envelope ============

/// The tagged success/failure envelope wrapping every gateway reply.
///
/// Wire shape: `{ "success": bool, "data": T?, "error": { code, message }? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the call succeeded.
    pub success: bool,
    /// Response payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Structured failure, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GatewayError>,
}

impl<T> Envelope<T> {
    /// Create a success envelope.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failure envelope.
    #[must_use]
    pub fn failure(error: GatewayError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Unwrap the envelope into a `Result`.
    ///
    /// A success envelope without a payload, or a failure envelope without
    /// an error, is malformed and reported as a serialization error.
    pub fn into_result(self) -> crate::error::Result<T> {
        if self.success {
            self.data.ok_or_else(|| GatewayError::SerializationError {
                detail: "success envelope carried no data".to_string(),
            })
        } else {
            Err(self.error.unwrap_or_else(|| GatewayError::SerializationError {
                detail: "failure envelope carried no error".to_string(),
            }))
        }
    }
}

impl<T> From<crate::error::Result<T>> for Envelope<T> {
    fn from(result: crate::error::Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }
}
