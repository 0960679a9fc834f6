//! Domain-level error types.

use thiserror::Error;

use crate::ports::AuthError;

/// Domain errors - business logic failures.
///
/// A record owned by another user is reported as [`DomainError::NotFound`],
/// exactly like a record that does not exist.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed")]
    Unauthenticated,

    #[error("App password has not been set")]
    AppPasswordNotSet,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub(crate) fn not_found(entity: &str, id: i64) -> Self {
        DomainError::NotFound(format!("{entity} with id {id} not found"))
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) | AuthError::MissingToken => {
                DomainError::Unauthenticated
            }
            AuthError::HashingError(msg) => DomainError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_becomes_conflict() {
        let err = DomainError::from(RepoError::Constraint("duplicate key".to_string()));
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn test_storage_failure_becomes_internal() {
        let err = DomainError::from(RepoError::Connection("refused".to_string()));
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn test_token_failures_never_leak_detail() {
        let err = DomainError::from(AuthError::InvalidToken("bad signature".to_string()));
        assert!(matches!(err, DomainError::Unauthenticated));
        assert_eq!(err.to_string(), "Authentication failed");
    }
}
