//! SQLite implementation of the DocumentStore trait.
//!
//! The persistent backend for Namereg. It uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use namereg_core::ETag;

use crate::error::{Result, StoreError};
use crate::migration::{self, now_millis};
use crate::traits::{DocumentStore, StoredDocument, WriteResult};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime. A conditional write is a single
/// `UPDATE ... WHERE etag = ?`, so the compare and the replace are atomic.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn read(&self, key: &str) -> Result<Option<StoredDocument>> {
        let key = key.to_string();

        self.run_blocking(move |conn| {
            let row: Option<(Vec<u8>, String)> = conn
                .query_row(
                    "SELECT body, etag FROM documents WHERE key = ?1",
                    params![key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            Ok(row.map(|(body, etag)| StoredDocument {
                body: Bytes::from(body),
                etag: ETag::new(etag),
            }))
        })
        .await
    }

    async fn conditional_write(
        &self,
        key: &str,
        body: Bytes,
        expected: &ETag,
    ) -> Result<WriteResult> {
        let key = key.to_string();
        let expected = expected.clone();

        self.run_blocking(move |conn| {
            let etag = ETag::of(&body);
            let updated = conn.execute(
                "UPDATE documents SET body = ?1, etag = ?2, updated_at = ?3
                 WHERE key = ?4 AND etag = ?5",
                params![
                    body.as_ref(),
                    etag.as_str(),
                    now_millis(),
                    key,
                    expected.as_str()
                ],
            )?;

            if updated == 1 {
                return Ok(WriteResult::Written(etag));
            }

            // Nothing matched: either the tag moved on or the row is gone.
            let exists: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM documents WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;

            match exists {
                Some(_) => Ok(WriteResult::PreconditionFailed),
                None => Err(StoreError::NotFound(key)),
            }
        })
        .await
    }

    async fn put_if_absent(&self, key: &str, body: Bytes) -> Result<bool> {
        let key = key.to_string();

        self.run_blocking(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO documents (key, body, etag, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![key, body.as_ref(), ETag::of(&body).as_str(), now_millis()],
            )?;
            Ok(inserted == 1)
        })
        .await
    }
}
