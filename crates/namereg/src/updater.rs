//! The name registry updater: optimistic read-modify-write of the shared document.
//!
//! One `apply` call reads the document and its tag, checks and mutates the
//! mapping in memory, then writes it back only if the tag is unchanged. A
//! lost race surfaces as [`ConflictReason::ConcurrentUpdate`]; retrying is
//! the caller's decision.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use namereg_core::{ChangeRejected, ETag, IdentityHash, NameChange, NameRegistry};
use namereg_store::{DocumentStore, StoreError, WriteResult};

use crate::error::ServiceError;

/// Why an update was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Some entry already holds the requested name.
    NameTaken,
    /// The document changed between our read and our write.
    ConcurrentUpdate,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::NameTaken => f.write_str("name taken"),
            ConflictReason::ConcurrentUpdate => f.write_str("concurrent update"),
        }
    }
}

/// The change that was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedChange {
    Removed,
    Renamed(String),
}

/// A committed update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub change: AppliedChange,
    /// The registry as written.
    pub registry: NameRegistry,
    /// Tag of the written document.
    pub etag: ETag,
}

impl Applied {
    /// Human-readable confirmation for the caller.
    pub fn confirmation(&self) -> String {
        match &self.change {
            AppliedChange::Removed => "Entry removed.".to_string(),
            AppliedChange::Renamed(name) => format!("Renamed to {}.", name),
        }
    }
}

/// Result of one `apply` call.
#[derive(Debug)]
pub enum Outcome {
    Applied(Applied),
    Conflict(ConflictReason),
    StoreUnavailable(ServiceError),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Applies name changes to the registry document held in a [`DocumentStore`].
///
/// Holds no per-request state; clone freely.
pub struct NameRegistryUpdater<S: DocumentStore> {
    store: Arc<S>,
    document_key: String,
}

impl<S: DocumentStore> Clone for NameRegistryUpdater<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            document_key: self.document_key.clone(),
        }
    }
}

impl<S: DocumentStore> NameRegistryUpdater<S> {
    /// Create an updater for the document at `document_key`.
    pub fn new(store: Arc<S>, document_key: impl Into<String>) -> Self {
        Self {
            store,
            document_key: document_key.into(),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The key of the registry document.
    pub fn document_key(&self) -> &str {
        &self.document_key
    }

    /// Apply a rename or removal for a verified identity.
    ///
    /// `raw_desired_name` is the trimmed request body; the deletion
    /// sentinels are recognized here.
    pub async fn apply(&self, identity: &IdentityHash, raw_desired_name: &str) -> Outcome {
        let change = NameChange::parse(raw_desired_name);

        let outcome = match self.try_apply(identity, &change).await {
            Ok(outcome) => outcome,
            Err(err) => Outcome::StoreUnavailable(err),
        };

        match &outcome {
            Outcome::Applied(applied) => {
                tracing::info!(
                    identity = %identity,
                    removed = change.is_removal(),
                    entries = applied.registry.len(),
                    "registry updated"
                );
            }
            Outcome::Conflict(reason) => {
                tracing::warn!(identity = %identity, %reason, "registry update refused");
            }
            Outcome::StoreUnavailable(err) => {
                tracing::error!(identity = %identity, error = %err, "registry store unavailable");
            }
        }

        outcome
    }

    async fn try_apply(
        &self,
        identity: &IdentityHash,
        change: &NameChange,
    ) -> Result<Outcome, ServiceError> {
        let document = self
            .store
            .read(&self.document_key)
            .await
            .map_err(ServiceError::Read)?
            .ok_or_else(|| ServiceError::DocumentMissing(self.document_key.clone()))?;

        let mut registry =
            NameRegistry::from_json(&document.body).map_err(ServiceError::MalformedDocument)?;

        if let Err(ChangeRejected::NameTaken { holder }) = registry.apply(identity, change) {
            tracing::debug!(identity = %identity, holder = %holder, "name already held");
            return Ok(Outcome::Conflict(ConflictReason::NameTaken));
        }

        let body = Bytes::from(registry.to_json().map_err(ServiceError::Encode)?);

        match self
            .store
            .conditional_write(&self.document_key, body, &document.etag)
            .await
        {
            Ok(WriteResult::Written(etag)) => Ok(Outcome::Applied(Applied {
                change: match change {
                    NameChange::Remove => AppliedChange::Removed,
                    NameChange::Rename(name) => AppliedChange::Renamed(name.clone()),
                },
                registry,
                etag,
            })),
            Ok(WriteResult::PreconditionFailed) => {
                Ok(Outcome::Conflict(ConflictReason::ConcurrentUpdate))
            }
            // Deleted between read and write: no longer the document we read.
            Err(StoreError::NotFound(key)) => Err(ServiceError::DocumentMissing(key)),
            Err(err) => Err(ServiceError::Write(err)),
        }
    }
}
