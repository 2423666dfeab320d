#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use proposer_api::auth::jwt::{generate_token, JwtConfig};
use proposer_api::auth::password::PasswordConfig;
use proposer_api::bootstrap;
use proposer_api::config::{Environment, ServerConfig, DEFAULT_ADMIN_BOOTSTRAP_PASSWORD};
use proposer_api::router::build_app_router;
use proposer_api::state::AppState;
use proposer_db::models::user::{CreateUser, User};
use proposer_db::repositories::UserRepo;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";
pub const ADMIN_PASSWORD: &str = DEFAULT_ADMIN_BOOTSTRAP_PASSWORD;

/// Build a test `ServerConfig` with safe defaults.
///
/// The template directory does not exist unless a test supplies one.
pub fn test_config() -> ServerConfig {
    test_config_with_templates(&std::env::temp_dir().join("proposer-api-tests-no-templates"))
}

pub fn test_config_with_templates(template_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        environment: Environment::Development,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expiry_hours: 24,
        },
        password: PasswordConfig::default(),
        template_dir: PathBuf::from(template_dir),
        template_max_upload_bytes: 64 * 1024,
        admin_bootstrap_password: ADMIN_PASSWORD.to_string(),
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState::new(pool, config.clone()), &config)
}

/// Build the app from an arbitrary configuration.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    build_app_router(AppState::new(pool, config.clone()), &config)
}

/// Same as [`build_test_app`] but serving templates from `template_dir`.
pub fn build_test_app_with_templates(pool: PgPool, template_dir: &Path) -> Router {
    let config = test_config_with_templates(template_dir);
    build_app_router(AppState::new(pool, config.clone()), &config)
}

/// Run the first-start seeding against `pool`.
pub async fn run_bootstrap(pool: &PgPool) {
    bootstrap::run(pool, &test_config())
        .await
        .expect("bootstrap should succeed");
}

/// Insert a user directly. The stored hash is not a real hash, so this user
/// can only authenticate via [`token_for`].
pub async fn create_user(pool: &PgPool, username: &str, is_admin: bool) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: Some(format!("{username}@test.com")),
            password_hash: "not-a-real-hash".to_string(),
            is_admin,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Mint a valid token for `user` with the test secret.
pub fn token_for(user: &User) -> String {
    generate_token(
        user.id,
        &user.username,
        user.is_admin,
        &test_config().jwt,
    )
    .expect("token generation should succeed")
}

/// Shortcut: a fresh admin (not the reserved one) and their token.
pub async fn admin_token(pool: &PgPool) -> String {
    token_for(&create_user(pool, "test-admin", true).await)
}

/// Shortcut: a fresh non-admin user and their token.
pub async fn user_token(pool: &PgPool) -> String {
    token_for(&create_user(pool, "test-user", false).await)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn bare_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, bare_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, bare_request(Method::GET, uri, Some(token))).await
}

/// GET with the token supplied only as the `token` cookie.
pub async fn get_with_cookie(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(COOKIE, format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), &body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, bare_request(Method::POST, uri, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, bare_request(Method::DELETE, uri, Some(token))).await
}

/// Log in through the API and return the issued token.
pub async fn login(app: Router, username: &str, password: &str) -> String {
    let response = post_json(
        app,
        "/api/login",
        serde_json::json!({ "username": username, "password": password }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK, "login should succeed");
    body_json(response).await["token"]
        .as_str()
        .expect("login response must contain a token")
        .to_string()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body should be JSON")
}
