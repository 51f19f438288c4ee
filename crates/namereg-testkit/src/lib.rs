//! # Namereg Testkit
//!
//! Testing utilities for Namereg.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a [`TokenSigner`] standing in for the identity service,
//!   and a [`TestFixture`] wiring it to a memory-backed service
//! - **Generators**: Proptest strategies for identities, names, and op sequences
//! - **Vectors**: Request/response/document cases every backend must satisfy
//!
//! ## Test Fixtures
//!
//! ```rust
//! use namereg_testkit::TestFixture;
//!
//! # tokio_test_runtime(async {
//! let fixture = TestFixture::new();
//! let response = fixture.post_as("abc123", "Alice").await;
//! assert_eq!(response.body, "Renamed to Alice.");
//! assert_eq!(fixture.document().await.as_deref(), Some(r#"{"abc123":"Alice"}"#));
//! # });
//! # fn tokio_test_runtime<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use namereg_testkit::generators::op_sequence;
//!
//! proptest! {
//!     #[test]
//!     fn names_stay_unique(ops in op_sequence(32)) {
//!         // apply ops, check the registry
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{TestFixture, TokenSigner, DOCUMENT_KEY};
pub use generators::NameOp;
pub use vectors::{all_vectors, UpdateVector};
