//! Shared helpers for the end-to-end HTTP tests.
//!
//! Requests go through the real router in-process with
//! `tower::ServiceExt::oneshot`; no socket is opened.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use customers::{CustomerStore, InMemoryStore, ServerConfig, ServerState, SqliteStore, build_router};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const API_KEY: &str = "test-api-key";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        api_key: API_KEY.to_string(),
        database_url: "memory".to_string(),
        ..ServerConfig::default()
    }
}

pub fn app_with_store(store: Arc<dyn CustomerStore>) -> Router {
    build_router(Arc::new(ServerState::new(test_config(), store)))
}

/// Router over a fresh in-memory store.
pub fn memory_app() -> Router {
    app_with_store(Arc::new(InMemoryStore::new()))
}

/// Router over a fresh SQLite `:memory:` database.
pub async fn sqlite_app() -> Router {
    let store = SqliteStore::in_memory()
        .await
        .expect("in-memory sqlite should open");
    app_with_store(Arc::new(store))
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or `Value::Null` when the body is empty.
    pub body: Value,
}

pub async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Send `method uri` with an optional API key and optional JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    api_key: Option<&str>,
    json: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("X-API-KEY", key);
    }
    let body = match json {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    send_request(app, builder.body(body).expect("valid request")).await
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, Some(API_KEY), None).await
}

pub async fn post(app: &Router, uri: &str, json: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(API_KEY), Some(json)).await
}

pub async fn put(app: &Router, uri: &str, json: Value) -> TestResponse {
    send(app, Method::PUT, uri, Some(API_KEY), Some(json)).await
}

pub async fn patch(app: &Router, uri: &str, json: Value) -> TestResponse {
    send(app, Method::PATCH, uri, Some(API_KEY), Some(json)).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::DELETE, uri, Some(API_KEY), None).await
}

/// Keys of a validation error body, sorted.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_object()
        .map(|fields| fields.keys().cloned().collect())
        .unwrap_or_default()
}
