use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Insufficient repair tokens: {available} available")]
    InsufficientTokens { available: i32 },

    #[error("Invalid drill state: {0}")]
    InvalidDrillState(String),

    #[error("Insufficient content: {0}")]
    InsufficientContent(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
