//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export the gateway error type
pub use dns_console_gateway::GatewayError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Validation error (missing adapter, bad argument)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Gateway error (converting from the boundary library)
    #[error("{0}")]
    Gateway(#[from] GatewayError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist,
    /// etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_) => true,
            Self::Gateway(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Whether the underlying cause is a credential failure.
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::Gateway(e) if e.is_credential_error())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
