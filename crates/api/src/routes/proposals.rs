use axum::routing::get;
use axum::Router;

use crate::handlers::proposals;
use crate::state::AppState;

/// Routes mounted at `/proposals`.
///
/// ```text
/// GET  /       -> list_proposals
/// POST /       -> create_proposal
/// GET  /{id}   -> get_proposal
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(proposals::list_proposals).post(proposals::create_proposal),
        )
        .route("/{id}", get(proposals::get_proposal))
}
