/// Domain error taxonomy shared across crates.
///
/// Each variant maps to exactly one HTTP status at the API boundary
/// (404, 400, 401, 403, 500 respectively); handlers propagate these with
/// `?` rather than rendering responses themselves.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
