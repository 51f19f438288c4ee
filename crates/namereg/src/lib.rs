//! # Namereg
//!
//! A display-name registry behind a single endpoint. Callers present an
//! identity token issued elsewhere; the service verifies it, then claims,
//! changes, or releases the caller's display name in one shared JSON
//! document, writing only if nobody else wrote first.
//!
//! ## Key Types
//!
//! - [`NameService`] - Request in, response out, CORS headers on everything
//! - [`NameRegistryUpdater`] - Optimistic read-modify-write of the registry document
//! - [`Outcome`] - Applied, conflict, or store fault
//! - [`ServiceConfig`] - Startup configuration from `NAMEREG_*` variables
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use namereg::{NameRegistryUpdater, NameRequest, NameService};
//! use namereg::core::TokenVerifier;
//! use namereg::store::MemoryStore;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(MemoryStore::with_document("names.json", "{}"));
//! let service = NameService::new(
//!     TokenVerifier::embedded().unwrap(),
//!     NameRegistryUpdater::new(store, "names.json"),
//! );
//!
//! let response = service.handle(&NameRequest::post(None, "Alice")).await;
//! assert_eq!(response.status.as_u16(), 401);
//! assert_eq!(response.body, "Missing header.");
//! # });
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod updater;

pub use config::ServiceConfig;
pub use error::{ConfigError, Result, ServiceError};
pub use http::router;
pub use service::{NameRequest, NameResponse, NameService};
pub use updater::{Applied, AppliedChange, ConflictReason, NameRegistryUpdater, Outcome};

// Re-export dependencies for convenience
pub use namereg_core as core;
pub use namereg_store as store;
