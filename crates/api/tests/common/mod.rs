//! Shared helpers for HTTP integration tests.
//!
//! Requests go straight to the router through `tower::ServiceExt::oneshot`,
//! without a TCP listener. Storage is the in-memory data source, so these
//! tests need no database.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use stencil_api::config::{CorsConfig, DatabaseConfig, LogConfig, ServerConfig};
use stencil_api::router::build_app_router;
use stencil_api::state::AppState;
use stencil_db::memory::{MemoryDataSource, MemoryStore};
use stencil_db::{DataSource, PoolSettings, RetryPolicy};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as the only CORS origin and a 30-second
/// request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        workers: None,
        request_timeout_secs: 30,
        cors: CorsConfig {
            origins: vec!["http://localhost:5173".to_string()],
            methods: vec!["GET".into(), "POST".into(), "PUT".into(), "DELETE".into()],
            headers: vec!["content-type".into()],
            credentials: true,
        },
        log: LogConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            pool: PoolSettings::default(),
            retry: RetryPolicy {
                attempts: 1,
                delay: Duration::ZERO,
            },
            auto_create_tables: false,
        },
    }
}

/// Build the full application router over `data_source`.
///
/// Uses the same builder as `main.rs` so tests exercise the production
/// middleware stack.
pub fn build_app(data_source: Arc<dyn DataSource>) -> Router {
    build_app_router(AppState::new(data_source), &test_config())
        .expect("test config must build a router")
}

/// Build the full application router over an in-memory `store`.
pub fn build_test_app(store: MemoryStore) -> Router {
    build_app(Arc::new(MemoryDataSource::new(store)))
}

/// Router over a fresh, empty store.
pub fn app() -> Router {
    build_test_app(MemoryStore::new())
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
