use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/template`.
///
/// ```text
/// GET  /download  -> download_template
/// POST /upload    -> upload_template (body limited to `max_upload_bytes`)
/// POST /reset     -> reset_template
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/download", get(templates::download_template))
        .route(
            "/upload",
            post(templates::upload_template).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/reset", post(templates::reset_template))
}
