//! Handlers for the `/form-structure` resource.
//!
//! Every save inserts a new version; the newest version is the current one.

use axum::extract::{Path, State};
use axum::Json;
use proposer_core::error::CoreError;
use proposer_core::form_structure::{default_structure, validate_structure};
use proposer_core::types::DbId;
use proposer_db::models::form_structure::{FormStructureSummary, FormStructureVersion};
use proposer_db::repositories::FormStructureRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `POST /form-structure`.
#[derive(Debug, Deserialize)]
pub struct SaveFormStructureRequest {
    pub structure: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct FormStructureResponse {
    pub structure: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct SaveFormStructureResponse {
    pub message: &'static str,
    pub id: DbId,
}

/// GET /api/form-structure
///
/// The newest saved structure, or a single empty section when none exists.
pub async fn get_current(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<FormStructureResponse>> {
    let structure = FormStructureRepo::find_current(&state.pool)
        .await?
        .map(|version| version.structure)
        .unwrap_or_else(default_structure);

    Ok(Json(FormStructureResponse { structure }))
}

/// POST /api/form-structure
///
/// Validate and store a new version. Invalid input stores nothing.
pub async fn save(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<SaveFormStructureRequest>,
) -> AppResult<Json<SaveFormStructureResponse>> {
    let structure = input.structure.ok_or(AppError::Core(CoreError::Validation(
        "Form structure is required".into(),
    )))?;
    let sections = validate_structure(&structure)?;

    let version = FormStructureRepo::insert(&state.pool, &structure).await?;

    tracing::info!(
        version_id = version.id,
        section_count = sections.len(),
        saved_by = admin.user_id,
        "Form structure saved"
    );

    Ok(Json(SaveFormStructureResponse {
        message: "Form structure saved successfully",
        id: version.id,
    }))
}

/// GET /api/form-structure/versions
pub async fn list_versions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<FormStructureSummary>>> {
    Ok(Json(FormStructureRepo::list_versions(&state.pool).await?))
}

/// GET /api/form-structure/versions/{id}
pub async fn get_version(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<FormStructureVersion>> {
    let version = FormStructureRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "FormStructure",
            id,
        }))?;
    Ok(Json(version))
}
