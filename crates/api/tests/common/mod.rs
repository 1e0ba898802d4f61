//! Shared helpers for HTTP-level integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the
//! same middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses, with a filesystem-backed media store
//! instead of the remote image host.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use inkpost_api::auth::jwt::TokenConfig;
use inkpost_api::config::{MediaConfig, ServerConfig};
use inkpost_api::routes;
use inkpost_api::state::AppState;
use inkpost_media::LocalMediaStore;

/// Multipart boundary used by the body builders below.
pub const BOUNDARY: &str = "inkpost-test-boundary";

/// Build a test `ServerConfig` with known secrets and the given staging dir.
pub fn test_config(upload_staging_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_staging_dir,
        tokens: TokenConfig {
            access_secret: "test-access-secret-long-enough".to_string(),
            access_expiry_mins: 15,
            refresh_secret: "test-refresh-secret-long-enough".to_string(),
            refresh_expiry_days: 7,
        },
        media: MediaConfig {
            base_url: "http://img.invalid".to_string(),
            api_key: "unused-in-tests".to_string(),
            timeout_secs: 5,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool and a local media store under a scratch dir.
pub fn build_test_app(pool: PgPool) -> Router {
    let scratch = std::env::temp_dir().join(format!("inkpost-test-{}", Uuid::new_v4()));
    let config = test_config(scratch.join("staging"));
    let media = LocalMediaStore::new(
        scratch.join("media"),
        "http://localhost:7000/media".to_string(),
    );

    let state = AppState {
        pool,
        config: Arc::new(config),
        media: Arc::new(media),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should not fail at the transport level")
}

/// GET a path with no credentials.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET a path with a `Cookie` header (e.g. `accessToken=...`).
pub async fn get_with_cookie(app: Router, path: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET a path with an `Authorization: Bearer` header.
pub async fn get_with_bearer(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a JSON body.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a JSON body with a `Cookie` header.
pub async fn post_json_with_cookie(
    app: Router,
    path: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST with an empty body and a `Cookie` header (logout, refresh).
pub async fn post_with_cookie(app: Router, path: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// DELETE with a `Cookie` header.
pub async fn delete_with_cookie(app: Router, path: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a multipart form. `texts` are plain fields; `files` are
/// `(slot, filename, bytes)` triples. `cookie` adds a `Cookie` header.
pub async fn send_multipart(
    app: Router,
    method: Method,
    path: &str,
    texts: &[(&str, &str)],
    files: &[(&str, &str, &[u8])],
    cookie: Option<&str>,
) -> Response {
    let body = multipart_body(texts, files);
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let request = builder.body(Body::from(body)).unwrap();
    send(app, request).await
}

/// Assemble a raw multipart/form-data body.
fn multipart_body(texts: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (name, filename, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

// ---------------------------------------------------------------------------
// Scenario helpers
// ---------------------------------------------------------------------------

/// Password used for every account created by [`register_user`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Register an account via the real multipart endpoint, with an avatar
/// file and `{username}@example.com` as the email.
pub async fn register_user(app: &Router, username: &str) -> Response {
    let email = format!("{username}@example.com");
    let full_name = format!("Test {username}");
    send_multipart(
        app.clone(),
        Method::POST,
        "/api/users/register",
        &[
            ("fullName", full_name.as_str()),
            ("email", email.as_str()),
            ("username", username),
            ("password", TEST_PASSWORD),
        ],
        &[("avatar", "avatar.png", b"\x89PNG-not-really")],
        None,
    )
    .await
}

/// Log in a previously registered account. Returns the response body
/// plus the access and refresh cookie values.
pub async fn login_user(app: &Router, username: &str) -> (serde_json::Value, String, String) {
    let response = post_json(
        app.clone(),
        "/api/users/login",
        serde_json::json!({ "username": username, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let access = cookie_value(&response, "accessToken").expect("login should set access cookie");
    let refresh = cookie_value(&response, "refreshToken").expect("login should set refresh cookie");
    let body = body_json(response).await;
    (body, access, refresh)
}

/// Register and log in, returning an `accessToken=...` cookie header value.
pub async fn authed_cookie(app: &Router, username: &str) -> String {
    let response = register_user(app, username).await;
    assert_eq!(
        response.status(),
        StatusCode::CREATED,
        "registration should succeed"
    );
    let (_, access, _) = login_user(app, username).await;
    format!("accessToken={access}")
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Extract a cookie's value from the response's `Set-Cookie` headers.
pub fn cookie_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{name}=")))
        .map(|v| {
            v.split(';')
                .next()
                .unwrap_or("")
                .trim_start_matches(&format!("{name}="))
                .to_string()
        })
}
