//! Handlers for the `/services` catalog.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use proposer_core::error::CoreError;
use proposer_core::service_catalog::{derive_title, validate_service, validate_unique_ids};
use proposer_core::types::DbId;
use proposer_db::models::service::{CreateService, Service, UpsertService};
use proposer_db::repositories::service_repo::UQ_TITLE;
use proposer_db::repositories::ServiceRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /services`.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    /// Derived from `name` when omitted.
    pub title: Option<String>,
    /// Appended after the last entry when omitted.
    pub display_order: Option<i32>,
}

/// One element of the `PUT /services` array.
#[derive(Debug, Deserialize)]
pub struct ServiceItem {
    pub id: Option<DbId>,
    pub name: String,
    pub title: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Serialize)]
pub struct ReplaceServicesResponse {
    pub message: &'static str,
    pub updated: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteServiceResponse {
    pub success: bool,
}

fn title_conflict(err: sqlx::Error) -> AppError {
    if proposer_db::is_unique_violation(&err, UQ_TITLE) {
        return AppError::Core(CoreError::Conflict(
            "Another service already uses this title".into(),
        ));
    }
    AppError::Database(err)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/services
///
/// The catalog in display order.
pub async fn list_services(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<Service>>> {
    Ok(Json(ServiceRepo::list(&state.pool).await?))
}

/// POST /api/services
pub async fn create_service(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let name = input.name.trim().to_string();
    let title = input.title.unwrap_or_else(|| derive_title(&name));
    let display_order = match input.display_order {
        Some(order) => order,
        None => ServiceRepo::next_display_order(&state.pool).await?,
    };
    validate_service(&name, &title, display_order)?;

    let service = ServiceRepo::create(
        &state.pool,
        &CreateService {
            name,
            title,
            display_order,
        },
    )
    .await
    .map_err(title_conflict)?;

    tracing::info!(service_id = service.id, created_by = admin.user_id, "Service created");
    Ok((StatusCode::CREATED, Json(service)))
}

/// PUT /api/services
///
/// Bulk upsert. Items with an `id` overwrite that row (or create it with
/// that id); items without one are inserted. Rows absent from the payload
/// are left alone. The whole batch commits or none of it does.
pub async fn replace_services(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(items): Json<Vec<ServiceItem>>,
) -> AppResult<Json<ReplaceServicesResponse>> {
    validate_unique_ids(items.iter().map(|item| item.id))?;

    let services = items
        .into_iter()
        .map(|item| {
            let name = item.name.trim().to_string();
            let title = item.title.unwrap_or_else(|| derive_title(&name));
            validate_service(&name, &title, item.display_order)?;
            Ok(UpsertService {
                id: item.id,
                name,
                title,
                display_order: item.display_order,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    let updated = ServiceRepo::replace_all(&state.pool, &services)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Service catalog update rolled back");
            title_conflict(e)
        })?;

    tracing::info!(updated, updated_by = admin.user_id, "Service catalog updated");

    Ok(Json(ReplaceServicesResponse {
        message: "Services updated successfully",
        updated,
    }))
}

/// DELETE /api/services/{id}
pub async fn delete_service(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DeleteServiceResponse>> {
    if !ServiceRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Service",
            id,
        }));
    }

    tracing::info!(service_id = id, deleted_by = admin.user_id, "Service deleted");
    Ok(Json(DeleteServiceResponse { success: true }))
}
