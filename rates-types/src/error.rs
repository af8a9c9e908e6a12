//! Error types for the currency rates store.

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Store-level errors.
///
/// A missing record is never an error; lookups return `Option`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store has no mapping for the record type. Raised once,
    /// when the store is constructed; the store must not be used afterwards.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any failure from the storage round-trip, passed through unchanged.
    #[error(transparent)]
    Backend(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_is_transparent() {
        let err: StoreError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.to_string(), "Database error: disk I/O error");
        assert!(matches!(err, StoreError::Backend(RepoError::Database(_))));
    }

    #[test]
    fn test_configuration_error_display() {
        let err = StoreError::Configuration("table \"currencies\" not found".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: table \"currencies\" not found"
        );
    }
}
