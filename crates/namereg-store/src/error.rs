//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// A rejected conditional write is not an error; see
/// [`WriteResult::PreconditionFailed`](crate::WriteResult::PreconditionFailed).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document not found.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Lock poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// Background task failed to complete.
    #[error("blocking task failed: {0}")]
    Task(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(err: &StoreError) -> &'static str {
        match err {
            StoreError::Database(_) => "database",
            StoreError::NotFound(_) => "not found",
            StoreError::Poisoned(_) => "poisoned",
            StoreError::Task(_) => "task",
            StoreError::Migration(_) => "migration",
        }
    }

    #[test]
    fn test_every_variant_has_a_producer() {
        let sqlite: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert_eq!(describe(&sqlite), "database");
        assert_eq!(
            StoreError::NotFound("names.json".into()).to_string(),
            "document not found: names.json"
        );
        assert_eq!(describe(&StoreError::Migration("v2".into())), "migration");
    }
}
