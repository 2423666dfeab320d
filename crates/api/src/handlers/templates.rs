//! Handlers for the proposal document template.

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use proposer_core::templates::{
    validate_template_content, validate_template_file_name, CUSTOM_TEMPLATE_FILE,
    DOCX_CONTENT_TYPE,
};
use serde::Serialize;
use tokio_util::io::ReaderStream;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const UPLOAD_FIELD: &str = "template";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /api/template/download
///
/// Stream the custom template, or the default when none was uploaded.
pub async fn download_template(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Response> {
    let path = state.templates.resolve().await?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to open template: {e}")))?;
    let file_size = file
        .metadata()
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .len();
    let stream = ReaderStream::new(file);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, DOCX_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, file_size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{CUSTOM_TEMPLATE_FILE}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// POST /api/template/upload
///
/// Accepts a multipart form with a required `template` field holding a
/// `.docx` file. Replaces the custom template.
pub async fn upload_template(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, data) = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing required '{UPLOAD_FIELD}' field"))
    })?;

    validate_template_file_name(&file_name)?;
    validate_template_content(&data)?;
    state.templates.store_custom(&data).await?;

    tracing::info!(
        bytes = data.len(),
        uploaded_by = admin.user_id,
        "Proposal template replaced"
    );

    Ok(Json(MessageResponse {
        message: "Template uploaded successfully",
    }))
}

/// POST /api/template/reset
///
/// Restore the shipped default as the custom template.
pub async fn reset_template(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<MessageResponse>> {
    state.templates.reset().await?;

    tracing::info!(reset_by = admin.user_id, "Proposal template reset to default");
    Ok(Json(MessageResponse {
        message: "Template reset to default",
    }))
}
