use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested transition is not legal from the entity's current status.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The submitted completion token does not match the stored one.
    #[error("Completion token does not match")]
    TokenMismatch,

    #[error("Internal error: {0}")]
    Internal(String),
}
