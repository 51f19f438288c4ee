//! Error types for Namereg Core.

use thiserror::Error;

/// Reasons an identity token was rejected.
///
/// These stay distinct for logging. Callers outside the core must collapse
/// every variant into a single "invalid token" outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("encoding error in {segment}: {reason}")]
    Encoding {
        segment: &'static str,
        reason: String,
    },

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("missing claim: {0}")]
    MissingClaim(&'static str),
}

/// Core errors outside token verification.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("malformed registry document: {0}")]
    MalformedDocument(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
