use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The single not-found shape used for tickets, whether the row is absent
    /// or merely outside the caller's location scope.
    pub fn ticket_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Ticket",
            id,
        }
    }
}
