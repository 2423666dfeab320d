pub mod auth;
pub mod form_structure;
pub mod health;
pub mod proposals;
pub mod services;
pub mod templates;
pub mod users;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                              login (public)
/// /logout                             clear token cookie (public)
/// /check-auth                         current user (auth)
///
/// /users                              list, create (admin)
/// /users/profile                      update own email/password (auth)
/// /users/{id}                         get, update, delete (admin)
///
/// /form-structure                     get current (auth), save version (admin)
/// /form-structure/versions            list versions (admin)
/// /form-structure/versions/{id}       get version (admin)
///
/// /services                           list (auth), create, bulk upsert (admin)
/// /services/{id}                      delete (admin)
///
/// /proposals                          list, create (auth)
/// /proposals/{id}                     get (auth)
///
/// /template/download                  download template (auth)
/// /template/upload                    upload .docx (admin)
/// /template/reset                     restore default (admin)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/form-structure", form_structure::router())
        .nest("/services", services::router())
        .nest("/proposals", proposals::router())
        .nest(
            "/template",
            templates::router(config.template_max_upload_bytes),
        )
}
