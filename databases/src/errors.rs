//! Error types for the favorites data-access layer.

/// Alias for Results returning [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the driver lifecycle and the favorites stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The graph store could not be reached or rejected the credentials.
    #[error("Failed to connect to Neo4j at {uri}: {reason}")]
    Connection { uri: String, reason: String },

    #[error("Invalid Neo4j configuration: {0}")]
    InvalidConfig(String),

    #[error("Neo4j driver has not been initialized")]
    NotInitialized,

    #[error("Neo4j driver is already initialized")]
    AlreadyInitialized,

    /// A required user, movie or favorite relationship is absent.
    #[error("Not found: user '{user_id}', movie '{movie_id}'")]
    NotFound { user_id: String, movie_id: String },

    #[error("Invalid sort field: '{0}'")]
    InvalidSort(String),

    #[error("Invalid sort order: '{0}'")]
    InvalidOrder(String),

    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    #[error("Failed to decode movie row: {0}")]
    Decode(#[from] neo4rs::DeError),
}

impl StoreError {
    pub(crate) fn not_found(user_id: &str, movie_id: &str) -> Self {
        Self::NotFound {
            user_id: user_id.to_string(),
            movie_id: movie_id.to_string(),
        }
    }

    /// True when the caller asked for something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("u-1", "603");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: user 'u-1', movie '603'");
    }

    #[test]
    fn test_other_errors_are_not_not_found() {
        assert!(!StoreError::NotInitialized.is_not_found());
        assert!(!StoreError::InvalidSort("x".to_string()).is_not_found());
    }
}
