//! Shared test utilities for Ark integration tests.
//!
//! Builds relay routers and live relay servers in front of a wiremock
//! stand-in for Ollama.

#![allow(dead_code)]

use ark::api::{create_router, AppState};
use ark::config::ArkConfig;
use axum::body::Body;
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

/// Upstream address nothing listens on.
pub const UNREACHABLE_UPSTREAM: &str = "http://127.0.0.1:1";

/// Relay config pointed at `upstream`.
pub fn config_for(upstream: &str) -> ArkConfig {
    let mut config = ArkConfig::default();
    config.upstream.base_url = upstream.to_string();
    config.upstream.status_timeout_seconds = 2;
    config.server.request_timeout_seconds = 10;
    config
}

/// Relay router in front of the mock upstream.
pub fn make_app_with_mock(mock_server: &MockServer) -> Router {
    make_app(config_for(&mock_server.uri()))
}

pub fn make_app(config: ArkConfig) -> Router {
    let state = AppState::new(Arc::new(config)).expect("relay state");
    create_router(Arc::new(state))
}

/// Serve the relay on an ephemeral port; returns its base URL.
pub async fn spawn_relay(config: ArkConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind relay");
    let addr = listener.local_addr().expect("relay addr");
    let app = make_app(config);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("relay server");
    });
    format!("http://{}", addr)
}

/// Ollama `/api/tags` body for the given model names.
pub fn tags_body(names: &[&str]) -> Value {
    let models: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "name": name,
                "model": name,
                "size": 4_661_224_676u64 + i as u64,
                "modified_at": "2024-05-01T10:20:30.123456789-07:00",
                "digest": format!("{:064x}", i + 1),
                "details": {"format": "gguf", "family": "llama"}
            })
        })
        .collect();
    json!({ "models": models })
}

/// Ollama buffered `/api/generate` body.
pub fn generate_body(model: &str, response: &str) -> Value {
    json!({
        "model": model,
        "created_at": "2024-05-01T17:20:30.5Z",
        "response": response,
        "done": true,
        "done_reason": "stop",
        "context": [1, 2, 3],
        "total_duration": 5_043_500_667u64,
        "load_duration": 5_025_959u64,
        "eval_count": 12
    })
}

/// Ollama buffered `/api/chat` body.
pub fn chat_body(model: &str, content: &str) -> Value {
    json!({
        "model": model,
        "created_at": "2024-05-01T17:20:30.5Z",
        "message": {"role": "assistant", "content": content},
        "done": true,
        "total_duration": 4_883_583_458u64
    })
}

/// Read a response body to a string.
pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("read body");
    String::from_utf8_lossy(&bytes).into_owned()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).expect("json body")
}
