//! Strong type definitions for Namereg.
//!
//! Identity hashes and version tags are both plain strings on the wire.
//! Newtypes keep one from being passed where the other is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The stable identity hash carried in a verified token's `hash` claim.
///
/// Opaque to this crate: it is only ever compared and used as a map key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityHash(String);

impl IdentityHash {
    /// Wrap an already-verified identity hash.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Borrow the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityHash({})", self.0)
    }
}

impl fmt::Display for IdentityHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An opaque version tag for a stored document.
///
/// Only meaningful for equality against another tag from the same store.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    /// Wrap a tag issued by a store.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Derive a tag from document bytes (lowercase hex Blake3).
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(blake3::hash(bytes).as_bytes()))
    }

    /// Borrow the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.0.get(..16).unwrap_or(&self.0);
        write!(f, "ETag({})", short)
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
