use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /          -> list_users
/// POST   /          -> create_user
/// PUT    /profile   -> update_profile
/// GET    /{id}      -> get_user
/// PUT    /{id}      -> update_user
/// DELETE /{id}      -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/profile", put(users::update_profile))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
