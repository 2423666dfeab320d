use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// GET    /       -> list_services
/// POST   /       -> create_service
/// PUT    /       -> replace_services
/// DELETE /{id}   -> delete_service
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(services::list_services)
                .post(services::create_service)
                .put(services::replace_services),
        )
        .route("/{id}", delete(services::delete_service))
}
