use crate::types::DbId;

/// Why a request could not be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("No token provided")]
    NoTokenProvided,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AuthFailure {
    /// Machine-readable code used in error response bodies.
    pub fn code(self) -> &'static str {
        match self {
            AuthFailure::NoTokenProvided => "NO_TOKEN_PROVIDED",
            AuthFailure::TokenExpired => "TOKEN_EXPIRED",
            AuthFailure::TokenInvalid => "TOKEN_INVALID",
            AuthFailure::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(AuthFailure),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
