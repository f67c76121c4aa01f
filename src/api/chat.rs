//! Multi-turn chat handler.

use crate::api::validation::validate_chat;
use crate::api::{AppState, ChatMessage, ChatReply, ChatRequest, Operation, RelayError, Role};
use crate::config::UpstreamConfig;
use crate::logging::{preview_chat, RequestId};
use crate::upstream::{ChatBody, SamplingOptions};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the upstream chat body.
///
/// Prepends the configured system preamble when the conversation carries no
/// system message. Chat is always buffered upstream.
pub fn build_chat_body(request: ChatRequest, upstream: &UpstreamConfig) -> ChatBody {
    let mut messages = request.messages;
    if !messages.iter().any(|m| m.role == Role::System) {
        messages.insert(0, ChatMessage::new(Role::System, upstream.system_prompt.clone()));
    }

    ChatBody {
        model: request
            .model
            .unwrap_or_else(|| upstream.default_model.clone()),
        messages,
        stream: false,
        options: SamplingOptions {
            temperature: request.temperature.unwrap_or(upstream.default_temperature),
            num_predict: request.max_tokens.unwrap_or(upstream.default_max_tokens),
        },
    }
}

/// PUT /api/ollama - Continue a conversation.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, RelayError> {
    let Json(request) = payload.inspect_err(|e| {
        warn!(request_id = %request_id, error = %e, "Rejected chat body");
    })?;
    validate_chat(&request).inspect_err(|e| {
        warn!(request_id = %request_id, error = %e, "Rejected chat request");
    })?;

    let preview = preview_chat(&request.messages, state.config.logging.enable_content_logging);
    let body = build_chat_body(request, &state.config.upstream);
    info!(
        request_id = %request_id,
        model = %body.model,
        messages = body.messages.len(),
        last_user = ?preview,
        "Chat request"
    );

    let reply = state.backend.chat(body).await.map_err(|e| {
        warn!(request_id = %request_id, error = %e, "Chat failed");
        RelayError::upstream(Operation::Chat, e)
    })?;

    info!(
        request_id = %request_id,
        model = %reply.model,
        total_duration = ?reply.total_duration,
        "Chat completed"
    );
    Ok(Json(reply))
}
