//! Error types for the service.

use namereg_core::CoreError;
use namereg_store::StoreError;
use thiserror::Error;

/// Infrastructure faults behind a failed name update.
///
/// Every variant maps to a 500 response; the variants exist so logs say
/// which step failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The registry document does not exist in the store.
    #[error("registry document {0:?} not found")]
    DocumentMissing(String),

    /// The stored document is not a flat string-to-string JSON object.
    #[error("registry document is malformed: {0}")]
    MalformedDocument(CoreError),

    /// Reading the document failed.
    #[error("reading registry document failed: {0}")]
    Read(StoreError),

    /// Serializing the updated registry failed.
    #[error("encoding registry document failed: {0}")]
    Encode(CoreError),

    /// Writing the document failed for a reason other than a stale tag.
    #[error("writing registry document failed: {0}")]
    Write(StoreError),
}

impl ServiceError {
    /// Whether the fault happened before any write was attempted.
    pub fn is_read_side(&self) -> bool {
        matches!(
            self,
            ServiceError::DocumentMissing(_) | ServiceError::MalformedDocument(_) | ServiceError::Read(_)
        )
    }
}

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    /// The configured public key could not be loaded.
    #[error("invalid public key: {0}")]
    PublicKey(#[from] CoreError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
