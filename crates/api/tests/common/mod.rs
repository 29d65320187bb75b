//! Shared helpers for API integration tests.
//!
//! Builds the application router through the same [`build_app_router`] used
//! by `main.rs`, so tests exercise the production middleware stack (CORS,
//! request ID, timeout, tracing, panic recovery). Requests are sent with
//! `tower::ServiceExt::oneshot`; no TCP listener is involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use rotorbase_api::config::ServerConfig;
use rotorbase_api::router::build_app_router;
use rotorbase_api::state::AppState;

/// Admin identity forwarded on admin requests.
pub const TEST_ADMIN_ID: i64 = 900;

/// Contributor identity forwarded on authenticated contributor requests.
pub const TEST_USER_ID: i64 = 42;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    headers: &[(&str, String)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// -- Anonymous / public requests --------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, &[]).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), &[]).await
}

// -- Contributor requests (x-user-id) ---------------------------------------

pub async fn user_post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(
        app,
        Method::POST,
        uri,
        Some(body),
        &[("x-user-id", TEST_USER_ID.to_string())],
    )
    .await
}

// -- Admin requests (x-admin-id) --------------------------------------------

fn admin_headers() -> Vec<(&'static str, String)> {
    vec![("x-admin-id", TEST_ADMIN_ID.to_string())]
}

pub async fn admin_get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, &admin_headers()).await
}

pub async fn admin_post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), &admin_headers()).await
}

pub async fn admin_post(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None, &admin_headers()).await
}

pub async fn admin_put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), &admin_headers()).await
}

pub async fn admin_delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, &admin_headers()).await
}
