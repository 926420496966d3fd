use crate::types::DbId;

/// Domain error taxonomy shared across crates.
///
/// The API layer maps each variant onto an HTTP status: `NotFound` 404,
/// `Validation` 400, `Conflict` 409, `Unauthorized` 401, `Forbidden` 403,
/// `Unavailable` 503, `Internal` 500.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
