//! Shared fixtures for the api integration tests.

#![allow(dead_code)]

use api_lib::adapters::InMemoryStore;
use api_lib::config::Config;
use api_lib::web::AppState;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn test_config() -> Config {
    Config::from_lookup(|key: &str| match key {
        "TOKEN_SECRET" => Some(TEST_SECRET.to_string()),
        "TOKEN_TTL_HOURS" => Some("1".to_string()),
        _ => None,
    })
    .expect("test config is valid")
}

/// App state over a fresh in-memory store. The store is returned too so tests
/// can reach under the services.
pub fn test_state() -> (Arc<AppState>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(Arc::new(test_config()), store.clone(), store.clone());
    (Arc::new(state), store)
}

pub fn test_app() -> (Router, Arc<InMemoryStore>) {
    let (state, store) = test_state();
    (api_lib::web::router(state), store)
}

/// Sends one request through the router and returns status and JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Registers `username` with a derived email and returns (id, token).
pub async fn register(app: &Router, username: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "hunter22",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {body}");
    (
        body["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}
