//! The name registry document and the changes that can be applied to it.
//!
//! The document is a flat JSON object from identity hash to display name.
//! This module is pure: reading and conditionally writing the document is
//! the store's and the updater's job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::IdentityHash;

/// Request bodies that mean "remove my entry" instead of a name.
///
/// Existing clients send these literally; the set must not change.
pub const DELETION_SENTINELS: [&str; 4] = ["", "\"\"", "null", "undefined"];

/// What a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameChange {
    /// Remove the caller's entry, if any.
    Remove,
    /// Claim the given display name.
    Rename(String),
}

impl NameChange {
    /// Interpret an already-trimmed request body.
    pub fn parse(raw: &str) -> Self {
        if DELETION_SENTINELS.contains(&raw) {
            NameChange::Remove
        } else {
            NameChange::Rename(raw.to_string())
        }
    }

    /// Whether this change removes an entry.
    pub fn is_removal(&self) -> bool {
        matches!(self, NameChange::Remove)
    }
}

/// Why a change could not be applied to the in-memory registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRejected {
    /// Some entry (possibly the caller's own) already holds the name.
    NameTaken {
        /// The identity currently holding the name.
        holder: IdentityHash,
    },
}

/// The shared identity-hash to display-name mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameRegistry {
    entries: BTreeMap<IdentityHash, String>,
}

impl NameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the stored document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::MalformedDocument(e.to_string()))
    }

    /// Serialize for storage. Keys are written in sorted order.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CoreError::EncodingError(e.to_string()))
    }

    /// Look up the name held by an identity.
    pub fn name_of(&self, identity: &IdentityHash) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    /// Find the identity currently holding a name. Exact, case-sensitive match.
    pub fn holder_of(&self, name: &str) -> Option<&IdentityHash> {
        self.entries
            .iter()
            .find(|(_, held)| held.as_str() == name)
            .map(|(identity, _)| identity)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&IdentityHash, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Apply a change for `identity`.
    ///
    /// A rename is rejected if any entry holds the name, including the
    /// caller's own. Removing an absent entry is a no-op.
    pub fn apply(
        &mut self,
        identity: &IdentityHash,
        change: &NameChange,
    ) -> std::result::Result<(), ChangeRejected> {
        match change {
            NameChange::Remove => {
                self.entries.remove(identity);
            }
            NameChange::Rename(name) => {
                if let Some(holder) = self.holder_of(name) {
                    return Err(ChangeRejected::NameTaken {
                        holder: holder.clone(),
                    });
                }
                self.entries.insert(identity.clone(), name.clone());
            }
        }
        Ok(())
    }
}

impl FromIterator<(IdentityHash, String)> for NameRegistry {
    fn from_iter<I: IntoIterator<Item = (IdentityHash, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
