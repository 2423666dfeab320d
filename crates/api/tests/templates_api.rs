//! HTTP-level tests for template download, upload, and reset.

mod common;

use std::path::Path;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use common::{admin_token, body_bytes, get_auth, post_auth, send, user_token};
use proposer_core::templates::{CUSTOM_TEMPLATE_FILE, DEFAULT_TEMPLATE_FILE, DOCX_CONTENT_TYPE};
use sqlx::PgPool;

const DEFAULT_DOCX: &[u8] = b"PK\x03\x04default-template";
const CUSTOM_DOCX: &[u8] = b"PK\x03\x04custom-template";
const BOUNDARY: &str = "proposer-test-boundary";

fn write_default(dir: &Path) {
    std::fs::write(dir.join(DEFAULT_TEMPLATE_FILE), DEFAULT_DOCX).unwrap();
}

async fn upload(app: Router, token: &str, field: &str, file_name: &str, data: &[u8]) -> Response {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/template/upload")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_serves_default_when_no_custom_template(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    write_default(dir.path());
    let token = user_token(&pool).await;
    let app = common::build_test_app_with_templates(pool, dir.path());

    let response = get_auth(app, "/api/template/download", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], DOCX_CONTENT_TYPE);
    let disposition = response.headers()[CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(CUSTOM_TEMPLATE_FILE));
    assert_eq!(body_bytes(response).await, DEFAULT_DOCX);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_without_any_template_is_500(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let token = user_token(&pool).await;
    let app = common::build_test_app_with_templates(pool, dir.path());

    let response = get_auth(app, "/api/template/download", &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_then_reset(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    write_default(dir.path());
    let token = admin_token(&pool).await;
    let app = common::build_test_app_with_templates(pool, dir.path());

    let response = upload(app.clone(), &token, "template", "mine.docx", CUSTOM_DOCX).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/template/download", &token).await;
    assert_eq!(body_bytes(response).await, CUSTOM_DOCX);

    let response = post_auth(app.clone(), "/api/template/reset", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, "/api/template/download", &token).await;
    assert_eq!(body_bytes(response).await, DEFAULT_DOCX);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_rejects_bad_files(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    write_default(dir.path());
    let token = admin_token(&pool).await;
    let app = common::build_test_app_with_templates(pool, dir.path());

    let cases: [(&str, &str, &[u8]); 3] = [
        ("template", "notes.txt", CUSTOM_DOCX),
        ("template", "fake.docx", b"not a zip".as_slice()),
        ("document", "mine.docx", CUSTOM_DOCX),
    ];
    for (field, file_name, data) in cases {
        let response = upload(app.clone(), &token, field, file_name, data).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field} {file_name}");
    }

    let mut oversized = b"PK\x03\x04".to_vec();
    oversized.resize(128 * 1024, 0);
    let response = upload(app, &token, "template", "big.docx", &oversized).await;
    assert!(response.status().is_client_error());

    assert!(!dir.path().join(CUSTOM_TEMPLATE_FILE).exists());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn template_changes_require_admin(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    write_default(dir.path());
    let token = user_token(&pool).await;
    let app = common::build_test_app_with_templates(pool, dir.path());

    let response = upload(app.clone(), &token, "template", "mine.docx", CUSTOM_DOCX).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(app, "/api/template/reset", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert!(!dir.path().join(CUSTOM_TEMPLATE_FILE).exists());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_without_default_fails(pool: PgPool) {
    let dir = tempfile::tempdir().unwrap();
    let token = admin_token(&pool).await;
    let app = common::build_test_app_with_templates(pool, dir.path());

    let response = post_auth(app, "/api/template/reset", &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
