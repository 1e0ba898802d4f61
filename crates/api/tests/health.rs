//! Integration tests for the health endpoint and the middleware stack
//! that every request passes through.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;

use common::{body_json, build_test_app, get};

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_ok_with_live_database(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn responses_carry_a_request_id(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/health").await;
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header should be set");
    assert!(!request_id.to_str().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let app = build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/blogs/all")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}
