//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business rule failures surfaced to the caller.
///
/// None of these are retried; each one is the terminal outcome of a request.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Missing `{}` in request body", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A foreign key that does not resolve to an existing record.
    #[error("{entity_type} with id {id} does not exist")]
    UnknownReference { entity_type: &'static str, id: Uuid },

    #[error("Request path id ({path}) and request body id ({declared}) must match")]
    IdMismatch { path: Uuid, declared: String },

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Store(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
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
