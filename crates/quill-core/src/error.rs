//! Domain-level error types.

use thiserror::Error;

/// Domain errors - the failure taxonomy every operation maps into.
///
/// `NotFound` covers both true absence and deliberate visibility masking;
/// callers must not be able to tell the two apart.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Constraint(String),
}
