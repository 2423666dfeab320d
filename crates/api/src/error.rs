//! HTTP error type shared by every handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use proposer_core::error::CoreError;
use serde_json::json;

/// Error returned from handlers and extractors.
///
/// Rendered as `{ "error", "code" }`. The cause of a 500 travels in an
/// [`ErrorDetail`] response extension; [`attach_error_detail`] copies it into
/// the body outside production.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request that never reached domain validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Everything needed to render one error response.
struct Rendered {
    status: StatusCode,
    code: &'static str,
    message: String,
    /// Cause of a 500.
    detail: Option<String>,
}

impl Rendered {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
        }
    }

    fn internal(detail: impl ToString) -> Self {
        Self {
            detail: Some(detail.to_string()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = match &self {
            AppError::Core(core) => render_core(core),
            AppError::Database(err) => render_sqlx(err),
            AppError::BadRequest(msg) => {
                Rendered::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.as_str())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Rendered::internal(msg)
            }
        };

        let body = json!({ "error": rendered.message, "code": rendered.code });
        let mut response = (rendered.status, axum::Json(body)).into_response();
        if let Some(detail) = rendered.detail {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

/// Underlying cause of an internal error, never serialized on its own.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Response mapper that rewrites a 500 carrying an [`ErrorDetail`] so its
/// body includes `detail`. Only mounted outside production.
pub async fn attach_error_detail(response: Response) -> Response {
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    let body = json!({
        "error": INTERNAL_MESSAGE,
        "code": "INTERNAL_ERROR",
        "detail": detail,
    });
    let rendered = axum::Json(body).into_response();
    Response::from_parts(parts, rendered.into_body())
}

fn render_core(err: &CoreError) -> Rendered {
    match err {
        CoreError::NotFound { entity, id } => Rendered::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Rendered::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.as_str())
        }
        CoreError::Conflict(msg) => Rendered::new(StatusCode::CONFLICT, "CONFLICT", msg.as_str()),
        CoreError::Unauthorized(failure) => {
            Rendered::new(StatusCode::UNAUTHORIZED, failure.code(), failure.to_string())
        }
        CoreError::Forbidden(msg) => Rendered::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.as_str()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            Rendered::internal(msg)
        }
    }
}

/// 404 for a missing row, 409 for `uq_*` unique or foreign key violations
/// (SQLSTATE 23505 / 23503), 500 for the rest.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found");
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return Rendered::internal(other);
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => Rendered::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        Some("23503") => Rendered::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "Resource is still referenced by other records",
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            Rendered::internal(db_err)
        }
    }
}
