use serde::{Deserialize, Serialize};

/// Unified error type for all gateway calls.
///
/// Transport-level failures (the call itself could not complete) and
/// application-level failures (the backend answered with a failure envelope)
/// are deliberately collapsed into this one taxonomy: callers handle both
/// through the same path. All variants are serializable so they can travel
/// inside an [`Envelope`](crate::types::Envelope).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code", content = "details")]
pub enum GatewayError {
    /// A network-level error occurred (connection refused, DNS failure, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The request timed out before the backend answered.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The account's provider credentials are invalid or expired.
    ///
    /// Coordinators react to this variant by refreshing the account list so
    /// the updated status/error fields become visible.
    InvalidCredentials {
        /// Original error message from the backend, if available.
        raw_message: Option<String>,
    },

    /// The backend API rate limit has been exceeded.
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided.
        retry_after: Option<u64>,
        /// Original error message from the backend, if available.
        raw_message: Option<String>,
    },

    /// The referenced account does not exist on the backend.
    AccountNotFound {
        /// ID of the account that was not found.
        account_id: String,
    },

    /// The referenced domain/zone does not exist.
    DomainNotFound {
        /// ID of the domain that was not found.
        domain_id: String,
    },

    /// The referenced DNS record does not exist.
    RecordNotFound {
        /// ID of the record that was not found.
        record_id: String,
    },

    /// A request parameter is invalid (bad TTL, malformed address, etc.).
    InvalidParameter {
        /// Name of the offending parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A request or response body could not be (de)serialized.
    SerializationError {
        /// Error details.
        detail: String,
    },

    /// A structured backend failure not covered by a specific variant.
    Backend {
        /// Machine-readable error code from the backend.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl GatewayError {
    /// Whether this error means the account's credentials are no longer
    /// usable. Coordinators use this to trigger an account-list refresh.
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials { .. })
    }

    /// Whether this is expected behavior (user input, missing resources),
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`. **Please update this method when new variants
    /// are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::AccountNotFound { .. }
                | Self::DomainNotFound { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::InvalidCredentials { raw_message } => {
                if let Some(msg) = raw_message {
                    write!(f, "Invalid credentials: {msg}")
                } else {
                    write!(f, "Invalid credentials")
                }
            }
            Self::RateLimited {
                retry_after,
                raw_message: _,
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::AccountNotFound { account_id } => {
                write!(f, "Account '{account_id}' not found")
            }
            Self::DomainNotFound { domain_id } => {
                write!(f, "Domain '{domain_id}' not found")
            }
            Self::RecordNotFound { record_id } => {
                write!(f, "Record '{record_id}' not found")
            }
            Self::InvalidParameter { param, detail } => {
                write!(f, "Invalid parameter '{param}': {detail}")
            }
            Self::SerializationError { detail } => {
                write!(f, "Serialization error: {detail}")
            }
            Self::Backend { code, message } => {
                write!(f, "[{code}] {message}")
            }
        }
    }
}

impl std::error::Error for GatewayError {}

/// Convenience type alias for `Result<T, GatewayError>`.
pub type Result<T> = std::result::Result<T, GatewayError>;
