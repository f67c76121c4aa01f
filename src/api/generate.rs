//! One-shot generation handler.

use crate::api::validation::validate_generation;
use crate::api::{AppState, GenerationRequest, GenerationResult, Operation, RelayError};
use crate::config::UpstreamConfig;
use crate::logging::{truncate_prompt, RequestId};
use crate::upstream::{ByteStream, GenerateBody, SamplingOptions};
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{info, warn};

/// Generation mode, decided solely by the request's `stream` flag.
#[derive(Debug, Clone)]
pub enum Generation {
    Buffered(GenerateBody),
    Streaming(GenerateBody),
}

impl Generation {
    /// Fill caller omissions from config and pick the mode.
    pub fn resolve(request: GenerationRequest, upstream: &UpstreamConfig) -> Self {
        let temperature = request
            .temperature
            .unwrap_or(upstream.default_temperature);
        let num_predict = request.max_tokens.unwrap_or(upstream.default_max_tokens);
        let system = request
            .system
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| upstream.system_prompt.clone());

        let body = GenerateBody {
            model: request
                .model
                .unwrap_or_else(|| upstream.default_model.clone()),
            prompt: request.prompt,
            system,
            stream: request.stream,
            options: SamplingOptions {
                temperature,
                num_predict,
            },
        };

        if request.stream {
            Generation::Streaming(body)
        } else {
            Generation::Buffered(body)
        }
    }

    pub fn body(&self) -> &GenerateBody {
        match self {
            Generation::Buffered(body) | Generation::Streaming(body) => body,
        }
    }
}

/// Response of the generate endpoint; the two shapes never mix.
pub enum GenerationResponse {
    Buffered(GenerationResult),
    Streaming(ByteStream),
}

impl IntoResponse for GenerationResponse {
    fn into_response(self) -> Response {
        match self {
            GenerationResponse::Buffered(result) => Json(result).into_response(),
            GenerationResponse::Streaming(stream) => (
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream")),
                    (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
                    (header::CONNECTION, HeaderValue::from_static("keep-alive")),
                ],
                Body::from_stream(stream),
            )
                .into_response(),
        }
    }
}

/// POST /api/ollama - Generate text, buffered or streamed.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<GenerationResponse, RelayError> {
    let Json(request) = payload.inspect_err(|e| {
        warn!(request_id = %request_id, error = %e, "Rejected generate body");
    })?;
    validate_generation(&request).inspect_err(|e| {
        warn!(request_id = %request_id, error = %e, "Rejected generate request");
    })?;

    let preview = truncate_prompt(&request.prompt, state.config.logging.enable_content_logging);
    let generation = Generation::resolve(request, &state.config.upstream);
    info!(
        request_id = %request_id,
        model = %generation.body().model,
        stream = matches!(generation, Generation::Streaming(_)),
        prompt = ?preview,
        "Generate request"
    );

    match generation {
        Generation::Buffered(body) => {
            let result = state.backend.generate(body).await.map_err(|e| {
                warn!(request_id = %request_id, error = %e, "Generation failed");
                RelayError::upstream(Operation::Generate, e)
            })?;
            info!(
                request_id = %request_id,
                model = %result.model,
                total_duration = ?result.total_duration,
                "Generation completed"
            );
            Ok(GenerationResponse::Buffered(result))
        }
        Generation::Streaming(body) => {
            let upstream = state.backend.generate_stream(body).await.map_err(|e| {
                warn!(request_id = %request_id, error = %e, "Streaming generation failed to start");
                RelayError::upstream(Operation::Generate, e)
            })?;

            let id = request_id.clone();
            let stream = upstream
                .inspect(move |chunk| {
                    if let Err(e) = chunk {
                        warn!(request_id = %id, error = %e, "Upstream stream interrupted");
                    }
                })
                .boxed();

            info!(request_id = %request_id, "Streaming generation started");
            Ok(GenerationResponse::Streaming(stream))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DEFAULT_MAX_TOKENS;

    #[test]
    fn test_resolve_fills_defaults() {
        let upstream = UpstreamConfig::default();
        let generation = Generation::resolve(GenerationRequest::new("hello"), &upstream);

        let Generation::Buffered(body) = generation else {
            panic!("expected buffered generation");
        };
        assert_eq!(body.model, "llama3:8b");
        assert_eq!(body.system, upstream.system_prompt);
        assert_eq!(body.options.temperature, 0.7);
        assert_eq!(body.options.num_predict, DEFAULT_MAX_TOKENS);
        assert!(!body.stream);
    }

    #[test]
    fn test_resolve_keeps_caller_values() {
        let request = GenerationRequest::new("hello")
            .with_system("Be creative.")
            .with_temperature(0.2)
            .with_max_tokens(128)
            .with_model("mistral:7b");
        let generation = Generation::resolve(request, &UpstreamConfig::default());

        let body = generation.body();
        assert_eq!(body.system, "Be creative.");
        assert_eq!(body.model, "mistral:7b");
        assert_eq!(body.options.temperature, 0.2);
        assert_eq!(body.options.num_predict, 128);
    }

    #[test]
    fn test_resolve_blank_system_uses_default() {
        let request = GenerationRequest::new("hello").with_system("   ");
        let generation = Generation::resolve(request, &UpstreamConfig::default());
        assert_eq!(generation.body().system, UpstreamConfig::default().system_prompt);
    }

    #[test]
    fn test_resolve_stream_flag_selects_variant() {
        let mut request = GenerationRequest::new("hello");
        request.stream = true;
        let generation = Generation::resolve(request, &UpstreamConfig::default());
        assert!(matches!(generation, Generation::Streaming(ref b) if b.stream));
    }

    #[test]
    fn test_streaming_response_headers() {
        let stream: ByteStream = futures::stream::empty().boxed();
        let response = GenerationResponse::Streaming(stream).into_response();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers[header::CONNECTION], "keep-alive");
    }
}
