//! In-memory implementation of the DocumentStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use namereg_core::ETag;

use crate::error::{Result, StoreError};
use crate::traits::{DocumentStore, StoredDocument, WriteResult};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock; the
/// write lock is held across compare and replace.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding one document.
    pub fn with_document(key: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let store = Self::new();
        if let Ok(mut documents) = store.documents.write() {
            documents.insert(key.into(), StoredDocument::new(body));
        }
        store
    }

    /// Unconditionally replace a document, returning its new tag.
    ///
    /// Simulates a writer that bypasses this service.
    pub fn overwrite(&self, key: &str, body: impl Into<Bytes>) -> Result<ETag> {
        let document = StoredDocument::new(body);
        let etag = document.etag.clone();
        self.documents
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?
            .insert(key.to_string(), document);
        Ok(etag)
    }

    /// Remove a document entirely.
    pub fn remove(&self, key: &str) -> Result<Option<StoredDocument>> {
        Ok(self
            .documents
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?
            .remove(key))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<StoredDocument>> {
        let documents = self
            .documents
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(documents.get(key).cloned())
    }

    async fn conditional_write(
        &self,
        key: &str,
        body: Bytes,
        expected: &ETag,
    ) -> Result<WriteResult> {
        let mut documents = self
            .documents
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;

        let current = documents
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        if &current.etag != expected {
            return Ok(WriteResult::PreconditionFailed);
        }

        *current = StoredDocument::new(body);
        Ok(WriteResult::Written(current.etag.clone()))
    }

    async fn put_if_absent(&self, key: &str, body: Bytes) -> Result<bool> {
        let mut documents = self
            .documents
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;

        if documents.contains_key(key) {
            return Ok(false);
        }
        documents.insert(key.to_string(), StoredDocument::new(body));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "names.json";

    #[tokio::test]
    async fn test_memory_store_read() {
        let store = MemoryStore::with_document(KEY, "{}");

        let doc = store.read(KEY).await.unwrap().unwrap();
        assert_eq!(doc.body, Bytes::from_static(b"{}"));
        assert_eq!(doc.etag, ETag::of(b"{}"));

        assert!(store.read("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_conditional_write() {
        let store = MemoryStore::with_document(KEY, "{}");
        let doc = store.read(KEY).await.unwrap().unwrap();

        let result = store
            .conditional_write(KEY, Bytes::from_static(b"{\"a\":\"A\"}"), &doc.etag)
            .await
            .unwrap();
        assert_eq!(result, WriteResult::Written(ETag::of(b"{\"a\":\"A\"}")));

        // The old tag is stale now.
        let result = store
            .conditional_write(KEY, Bytes::from_static(b"{}"), &doc.etag)
            .await
            .unwrap();
        assert_eq!(result, WriteResult::PreconditionFailed);

        let current = store.read(KEY).await.unwrap().unwrap();
        assert_eq!(current.body, Bytes::from_static(b"{\"a\":\"A\"}"));
    }

    #[tokio::test]
    async fn test_memory_store_external_overwrite_invalidates_tag() {
        let store = MemoryStore::with_document(KEY, "{}");
        let doc = store.read(KEY).await.unwrap().unwrap();
        store.overwrite(KEY, "{\"b\":\"B\"}").unwrap();

        let result = store
            .conditional_write(KEY, Bytes::from_static(b"{\"a\":\"A\"}"), &doc.etag)
            .await
            .unwrap();
        assert_eq!(result, WriteResult::PreconditionFailed);
    }

    #[tokio::test]
    async fn test_memory_store_write_missing() {
        let store = MemoryStore::new();
        let result = store
            .conditional_write(KEY, Bytes::from_static(b"{}"), &ETag::of(b"{}"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_memory_store_put_if_absent() {
        let store = MemoryStore::new();
        assert!(store.put_if_absent(KEY, Bytes::from_static(b"{}")).await.unwrap());
        assert!(!store
            .put_if_absent(KEY, Bytes::from_static(b"{\"x\":\"y\"}"))
            .await
            .unwrap());

        let doc = store.read(KEY).await.unwrap().unwrap();
        assert_eq!(doc.body, Bytes::from_static(b"{}"));
    }
}
