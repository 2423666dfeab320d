//! HTTP-level tests for the service catalog.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, delete_auth, get_auth, post_json_auth, put_json_auth, run_bootstrap,
    user_token,
};
use proposer_db::models::service::Service;
use proposer_db::repositories::ServiceRepo;
use serde_json::json;
use sqlx::PgPool;

fn snapshot(services: &[Service]) -> Vec<(i64, String, String, i32)> {
    services
        .iter()
        .map(|s| (s.id, s.name.clone(), s.title.clone(), s.display_order))
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bootstrap_catalog_is_listed_in_order(pool: PgPool) {
    run_bootstrap(&pool).await;
    let token = user_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/services", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let services = body_json(response).await;
    let services = services.as_array().unwrap();
    assert_eq!(services.len(), 17);
    assert_eq!(services[0]["title"], "iso27001certification");
    assert_eq!(services[16]["title"], "wapt");

    let orders: Vec<i64> = services
        .iter()
        .map(|s| s["display_order"].as_i64().unwrap())
        .collect();
    assert!(orders.windows(2).all(|w| w[0] <= w[1]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admin_cannot_change_catalog(pool: PgPool) {
    run_bootstrap(&pool).await;
    let before = snapshot(&ServiceRepo::list(&pool).await.unwrap());
    let token = user_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let first = before[0].0;

    let response = put_json_auth(
        app.clone(),
        "/api/services",
        json!([{ "id": first, "name": "Hijacked", "title": "hijacked", "display_order": 1 }]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        "/api/services",
        json!({ "name": "Sneaky" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app, &format!("/api/services/{first}"), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert_eq!(snapshot(&ServiceRepo::list(&pool).await.unwrap()), before);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_service_with_derived_title(pool: PgPool) {
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/services",
        json!({ "name": "Wireless Testing" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["title"], "wirelesstesting");
    assert_eq!(created["display_order"], 1);

    let response = post_json_auth(
        app,
        "/api/services",
        json!({ "name": "Wireless Testing Again", "title": "wirelesstesting" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_upsert_updates_and_inserts(pool: PgPool) {
    run_bootstrap(&pool).await;
    let existing = ServiceRepo::list(&pool).await.unwrap();
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = put_json_auth(
        app,
        "/api/services",
        json!([
            { "id": existing[0].id, "name": "ISO 27001 Audit", "title": "iso27001audit",
              "display_order": 1 },
            { "name": "Ransomware Readiness", "display_order": 18 }
        ]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["updated"], 2);

    let after = ServiceRepo::list(&pool).await.unwrap();
    assert_eq!(after.len(), 18);
    assert_eq!(after[0].id, existing[0].id);
    assert_eq!(after[0].name, "ISO 27001 Audit");
    assert_eq!(after[17].title, "ransomwarereadiness");
    // Untouched rows keep their values.
    assert_eq!(after[1].name, existing[1].name);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_bulk_payloads_change_nothing(pool: PgPool) {
    run_bootstrap(&pool).await;
    let before = snapshot(&ServiceRepo::list(&pool).await.unwrap());
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let first = before[0].0;

    // Bad title in the second item.
    let response = put_json_auth(
        app.clone(),
        "/api/services",
        json!([
            { "id": first, "name": "Renamed", "title": "renamed", "display_order": 1 },
            { "name": "Broken", "title": "Not A Slug", "display_order": 2 }
        ]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The same id twice.
    let response = put_json_auth(
        app.clone(),
        "/api/services",
        json!([
            { "id": first, "name": "One", "title": "one", "display_order": 1 },
            { "id": first, "name": "Two", "title": "two", "display_order": 2 }
        ]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Valid shape, but the second item clashes with an existing title.
    let taken_title = before[5].2.clone();
    let response = put_json_auth(
        app,
        "/api/services",
        json!([
            { "id": first, "name": "Renamed", "title": "renamed", "display_order": 1 },
            { "name": "Copy", "title": taken_title, "display_order": 30 }
        ]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    assert_eq!(snapshot(&ServiceRepo::list(&pool).await.unwrap()), before);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_service(pool: PgPool) {
    run_bootstrap(&pool).await;
    let target = ServiceRepo::list(&pool).await.unwrap()[3].id;
    let token = admin_token(&pool).await;
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/services/{target}");

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);
    assert_eq!(ServiceRepo::count(&pool).await.unwrap(), 16);

    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
