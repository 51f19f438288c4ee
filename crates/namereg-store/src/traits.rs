//! DocumentStore trait: the abstract interface for conditional-write storage.
//!
//! The updater only needs two things from a backend: read a document with
//! its current version tag, and replace it only if that tag still matches.
//! Implementations include SQLite (persistent) and in-memory (for tests).

use async_trait::async_trait;
use bytes::Bytes;
use namereg_core::ETag;

use crate::error::Result;

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    /// The exact stored bytes.
    pub body: Bytes,
    /// Version tag for `body`.
    pub etag: ETag,
}

impl StoredDocument {
    /// Build a document, deriving its tag from the bytes.
    pub fn new(body: impl Into<Bytes>) -> Self {
        let body = body.into();
        let etag = ETag::of(&body);
        Self { body, etag }
    }
}

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// The document was replaced; this is its new tag.
    Written(ETag),
    /// The stored tag no longer matched the expected one. Nothing was written.
    PreconditionFailed,
}

/// The DocumentStore trait: async key/value storage with compare-and-swap.
///
/// # Design Notes
///
/// - **No locks are exposed**: concurrent writers are serialized solely by
///   [`conditional_write`](DocumentStore::conditional_write).
/// - **Whole-document writes**: a write replaces the full body or nothing.
/// - **Missing documents**: `read` returns `None`; `conditional_write` on a
///   missing key fails with [`StoreError::NotFound`](crate::StoreError::NotFound).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document and its current version tag.
    async fn read(&self, key: &str) -> Result<Option<StoredDocument>>;

    /// Replace a document only if its current tag equals `expected`.
    async fn conditional_write(
        &self,
        key: &str,
        body: Bytes,
        expected: &ETag,
    ) -> Result<WriteResult>;

    /// Create a document only if the key is empty.
    ///
    /// Returns `true` if the document was created. Used for provisioning,
    /// never by the name updater.
    async fn put_if_absent(&self, key: &str, body: Bytes) -> Result<bool>;
}
