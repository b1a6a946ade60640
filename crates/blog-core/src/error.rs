//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),
}

/// Repository-level errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<DomainError> for RepoError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => RepoError::NotFound,
            DomainError::Validation(msg) => RepoError::Validation(msg),
            DomainError::Duplicate(msg) => RepoError::Constraint(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_repo_validation() {
        let err: RepoError = DomainError::Validation("title is blank".into()).into();
        assert_eq!(err, RepoError::Validation("title is blank".into()));
    }

    #[test]
    fn not_found_maps_to_repo_not_found() {
        let err: RepoError = DomainError::NotFound {
            entity_type: "post",
            id: 7,
        }
        .into();
        assert_eq!(err, RepoError::NotFound);
    }

    #[test]
    fn duplicate_maps_to_constraint() {
        let err: RepoError = DomainError::Duplicate("slug".into()).into();
        assert!(matches!(err, RepoError::Constraint(_)));
    }
}
