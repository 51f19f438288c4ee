//! # Namereg Store
//!
//! Storage abstraction for Namereg. Provides a trait-based interface for a
//! key/value document store with compare-and-swap writes, with SQLite and
//! in-memory implementations.
//!
//! ## Key Types
//!
//! - [`DocumentStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`StoredDocument`] - Document bytes plus their version tag
//! - [`WriteResult`] - Outcome of a conditional write
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use namereg_store::{DocumentStore, SqliteStore, WriteResult};
//!
//! async fn example() {
//!     let store = SqliteStore::open("names.db").unwrap();
//!     store.put_if_absent("names.json", Bytes::from_static(b"{}")).await.unwrap();
//!
//!     let doc = store.read("names.json").await.unwrap().unwrap();
//!     let next = Bytes::from_static(b"{\"abc123\":\"Alice\"}");
//!     match store.conditional_write("names.json", next, &doc.etag).await.unwrap() {
//!         WriteResult::Written(_) => {}
//!         WriteResult::PreconditionFailed => { /* someone else wrote first */ }
//!     }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Content-derived tags**: both backends tag a document with the hex
//!   Blake3 digest of its bytes.
//! - **Conflicts are values**: a stale tag yields `PreconditionFailed`, not an error.
//! - **Missing documents are errors on write**: only provisioning creates documents.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DocumentStore, StoredDocument, WriteResult};
