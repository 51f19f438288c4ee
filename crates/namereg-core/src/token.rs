//! Identity token verification.
//!
//! Tokens are compact JWS values: `base64url(header).base64url(payload).base64url(signature)`,
//! unpadded. The header must declare `ES256` and the signature must verify
//! against the configured key before the payload is even decoded.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;
use serde_json::Value;

use crate::crypto::Es256PublicKey;
use crate::error::{Result, TokenError};
use crate::types::IdentityHash;

/// The only algorithm accepted in a token header.
pub const SUPPORTED_ALGORITHM: &str = "ES256";

/// Payload claim holding the stable identity hash.
pub const IDENTITY_CLAIM: &str = "hash";

#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

/// Verifies identity tokens against a single fixed public key.
///
/// Stateless and cheap to clone; share one per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenVerifier {
    key: Es256PublicKey,
}

impl TokenVerifier {
    /// Create a verifier for the given key.
    pub const fn new(key: Es256PublicKey) -> Self {
        Self { key }
    }

    /// Verifier for the production identity service key.
    pub fn embedded() -> Result<Self> {
        Es256PublicKey::embedded().map(Self::new)
    }

    /// Verifier for a PEM-armored SPKI key.
    pub fn from_public_key_pem(pem: &str) -> Result<Self> {
        Es256PublicKey::from_pem(pem).map(Self::new)
    }

    /// Verifier for a DER-encoded SPKI key.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self> {
        Es256PublicKey::from_der(der).map(Self::new)
    }

    /// The key tokens are checked against.
    pub const fn public_key(&self) -> &Es256PublicKey {
        &self.key
    }

    /// Authenticate a token and return the identity hash it carries.
    ///
    /// Never panics on arbitrary input.
    pub fn verify(&self, token: &str) -> std::result::Result<IdentityHash, TokenError> {
        let mut parts = token.split('.');
        let (header_b64, payload_b64, signature_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s), None) => (h, p, s),
                _ => {
                    return Err(TokenError::Malformed(format!(
                        "expected 3 segments, got {}",
                        token.split('.').count()
                    )))
                }
            };

        if header_b64.is_empty() || payload_b64.is_empty() || signature_b64.is_empty() {
            return Err(TokenError::Malformed("empty segment".into()));
        }

        let header: TokenHeader = serde_json::from_slice(&decode_segment("header", header_b64)?)
            .map_err(|e| TokenError::Encoding {
                segment: "header",
                reason: e.to_string(),
            })?;
        if header.alg != SUPPORTED_ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm(header.alg));
        }

        // The signing input is the encoded text, not the decoded bytes.
        let signing_input = format!("{}.{}", header_b64, payload_b64);
        let signature = decode_segment("signature", signature_b64)?;
        self.key.verify(signing_input.as_bytes(), &signature)?;

        let payload: Value = serde_json::from_slice(&decode_segment("payload", payload_b64)?)
            .map_err(|e| TokenError::InvalidPayload(e.to_string()))?;
        let claims = payload
            .as_object()
            .ok_or_else(|| TokenError::InvalidPayload("payload is not a JSON object".into()))?;

        claims
            .get(IDENTITY_CLAIM)
            .and_then(Value::as_str)
            .map(IdentityHash::new)
            .ok_or(TokenError::MissingClaim(IDENTITY_CLAIM))
    }
}

fn decode_segment(segment: &'static str, encoded: &str) -> std::result::Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| TokenError::Encoding {
            segment,
            reason: e.to_string(),
        })
}
