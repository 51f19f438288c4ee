//! Cryptographic primitives for Namereg.
//!
//! Wraps ECDSA P-256 / SHA-256 verification (JWS `ES256`) with strong types.
//! Nothing here signs: tokens are issued by the external identity service.

use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};
use p256::pkcs8::DecodePublicKey;
use std::fmt;

use crate::error::{CoreError, Result, TokenError};

/// Public key of the identity service that issues login tokens.
///
/// SPKI, PEM armored. Tokens signed by any other key are rejected.
pub const EMBEDDED_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----
MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEBHeRvXUxh4O12jjfoGNN/naxqfXb
oyYY7Ma+pkALk2hk9PYPhVoHk5Ar03k94kyhE9v0i1AEVLXN9WuSqE5+eA==
-----END PUBLIC KEY-----
";

/// Length of a fixed-width `r || s` P-256 signature.
pub const SIGNATURE_LEN: usize = 64;

/// A P-256 public key used to verify identity tokens.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Es256PublicKey(VerifyingKey);

impl Es256PublicKey {
    /// Wrap an existing verifying key.
    pub const fn new(key: VerifyingKey) -> Self {
        Self(key)
    }

    /// Parse a PEM-armored SubjectPublicKeyInfo.
    pub fn from_pem(pem: &str) -> Result<Self> {
        VerifyingKey::from_public_key_pem(pem.trim())
            .map(Self)
            .map_err(|e| CoreError::InvalidPublicKey(e.to_string()))
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        VerifyingKey::from_public_key_der(der)
            .map(Self)
            .map_err(|e| CoreError::InvalidPublicKey(e.to_string()))
    }

    /// The key the production identity service signs with.
    pub fn embedded() -> Result<Self> {
        Self::from_pem(EMBEDDED_PUBLIC_KEY_PEM)
    }

    /// Get the inner verifying key.
    pub const fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }

    /// Verify a fixed-width signature over a message.
    ///
    /// Malformed signature bytes and a signature mismatch are
    /// indistinguishable to the caller.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> std::result::Result<(), TokenError> {
        if signature.len() != SIGNATURE_LEN {
            return Err(TokenError::InvalidSignature);
        }
        let sig = Signature::from_slice(signature).map_err(|_| TokenError::InvalidSignature)?;
        self.0
            .verify(message, &sig)
            .map_err(|_| TokenError::InvalidSignature)
    }

    /// SEC1 compressed point as hex, for logging.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_encoded_point(true).as_bytes())
    }
}

impl fmt::Debug for Es256PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Es256Pub({})", &self.to_hex()[..16])
    }
}

impl From<VerifyingKey> for Es256PublicKey {
    fn from(key: VerifyingKey) -> Self {
        Self(key)
    }
}
