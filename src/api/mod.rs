//! # Relay Service
//!
//! HTTP surface in front of the upstream Ollama server. One path carries
//! three operations selected by method; responses are reshaped into the
//! dashboard's contract.
//!
//! ## Endpoints
//!
//! - `GET /api/ollama` - Status check (always renders a [`StatusReport`])
//! - `POST /api/ollama` - One-shot generation, buffered or streamed
//! - `PUT /api/ollama` - Multi-turn chat (buffered)
//! - `GET /health` - Relay liveness, no upstream call
//!
//! ## Example
//!
//! ```no_run
//! use ark::api::{create_router, AppState};
//! use ark::config::ArkConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(ArkConfig::default());
//! let state = Arc::new(AppState::new(config)?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Status checks never fail: an unreachable upstream yields an offline report
//! with HTTP 500. Generate and chat failures use one envelope:
//! ```json
//! { "error": "Failed to chat", "details": "Upstream error 404: model not found" }
//! ```

mod chat;
pub mod error;
mod generate;
mod health;
mod status;
pub mod types;
pub mod validation;


pub use error::{FailureKind, Operation, RelayError};
pub use generate::{Generation, GenerationResponse};
pub use status::check_status;
pub use types::*;

use crate::config::ArkConfig;
use crate::logging::assign_request_id;
use crate::upstream::{LlmBackend, OllamaClient, UpstreamError};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Path of the relay endpoint.
pub const RELAY_PATH: &str = "/api/ollama";

/// Maximum request body size (10 MB).
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Shared application state accessible to all handlers.
///
/// Immutable after construction; requests share nothing else.
pub struct AppState {
    pub config: Arc<ArkConfig>,
    pub backend: Arc<dyn LlmBackend>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state backed by an [`OllamaClient`] for `config.upstream`.
    pub fn new(config: Arc<ArkConfig>) -> Result<Self, UpstreamError> {
        let request_timeout = Duration::from_secs(config.server.request_timeout_seconds);

        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| UpstreamError::Configuration(e.to_string()))?;

        let backend = OllamaClient::new(
            config.upstream.base_url(),
            http_client,
            Duration::from_secs(config.upstream.status_timeout_seconds),
            request_timeout,
        );

        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create state around an existing backend.
    pub fn with_backend(config: Arc<ArkConfig>, backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            config,
            backend,
            start_time: Instant::now(),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create the relay router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route(
            RELAY_PATH,
            get(status::handle).post(generate::handle).put(chat::handle),
        )
        .route("/health", get(health::handle))
        .layer(axum::middleware::from_fn(assign_request_id))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
