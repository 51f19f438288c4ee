//! # Namereg Core
//!
//! Pure primitives for Namereg: identity token verification, the name
//! registry document, and document version tags.
//!
//! This crate contains no I/O, no storage, no networking.
//!
//! ## Key Types
//!
//! - [`TokenVerifier`] - Authenticates an `ES256` identity token and yields its [`IdentityHash`]
//! - [`NameRegistry`] - The identity-hash to display-name mapping
//! - [`NameChange`] - A rename or a removal, parsed from the request body
//! - [`ETag`] - Opaque version tag used for compare-and-swap writes
//!
//! ## Usage
//!
//! ```rust
//! use namereg_core::{NameChange, NameRegistry, IdentityHash};
//!
//! let mut registry = NameRegistry::new();
//! let alice = IdentityHash::new("abc123");
//! registry.apply(&alice, &NameChange::parse("Alice")).unwrap();
//! assert_eq!(registry.name_of(&alice), Some("Alice"));
//!
//! // Literal sentinels such as `null` remove the entry.
//! registry.apply(&alice, &NameChange::parse("null")).unwrap();
//! assert!(registry.is_empty());
//! ```

pub mod crypto;
pub mod error;
pub mod registry;
pub mod token;
pub mod types;

pub use crypto::{Es256PublicKey, EMBEDDED_PUBLIC_KEY_PEM};
pub use error::{CoreError, Result, TokenError};
pub use registry::{ChangeRejected, NameChange, NameRegistry, DELETION_SENTINELS};
pub use token::{TokenVerifier, IDENTITY_CLAIM, SUPPORTED_ALGORITHM};
pub use types::{ETag, IdentityHash};
