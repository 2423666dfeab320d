use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness report.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency is usable, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether a proposal template (custom or default) can be served.
    pub template_available: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = proposer_db::health_check(&state.pool).await.is_ok();
    let template_available = state.templates.resolve().await.is_ok();

    Json(HealthResponse {
        status: if db_healthy && template_available {
            "ok"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        template_available,
    })
}

/// Mounted at the root, outside `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
