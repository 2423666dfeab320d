use axum::routing::get;
use axum::Router;

use crate::handlers::form_structure;
use crate::state::AppState;

/// Routes mounted at `/form-structure`.
///
/// ```text
/// GET  /                -> get_current
/// POST /                -> save
/// GET  /versions        -> list_versions
/// GET  /versions/{id}   -> get_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(form_structure::get_current).post(form_structure::save),
        )
        .route("/versions", get(form_structure::list_versions))
        .route("/versions/{id}", get(form_structure::get_version))
}
