//! Status check handler.

use crate::api::{AppState, StatusReport};
use crate::config::UpstreamConfig;
use crate::logging::RequestId;
use crate::upstream::LlmBackend;
use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

/// List upstream models and reshape them into a [`StatusReport`].
///
/// Never fails: any upstream error becomes an offline report.
pub async fn check_status(backend: &dyn LlmBackend, upstream: &UpstreamConfig) -> StatusReport {
    match backend.list_models().await {
        Ok(models) => StatusReport::online(
            models,
            &upstream.default_model,
            &upstream.default_model_patterns,
        ),
        Err(e) => {
            warn!(upstream = %backend.base_url(), error = %e, "Upstream unavailable");
            StatusReport::offline(e.to_string())
        }
    }
}

/// GET /api/ollama - Report upstream status and installed models.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> (StatusCode, Json<StatusReport>) {
    let report = check_status(state.backend.as_ref(), &state.config.upstream).await;

    let code = if report.is_online() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    info!(
        request_id = %request_id,
        state = ?report.state,
        models = report.available_models.len(),
        has_default_model = report.has_default_model,
        "Status check"
    );

    (code, Json(report))
}
