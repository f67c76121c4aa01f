//! Ollama upstream implementation.

use super::types::{ChatBody, ChatResponse, GenerateBody, GenerateResponse, TagsResponse};
use super::{ByteStream, LlmBackend, UpstreamError};
use crate::api::types::{ChatReply, GenerationResult, ModelInfo};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the native Ollama REST API.
///
/// - Model listing via GET /api/tags
/// - Generation via POST /api/generate (buffered or streaming)
/// - Chat via POST /api/chat (buffered)
#[derive(Clone)]
pub struct OllamaClient {
    /// Base URL without trailing slash (e.g. "http://localhost:11434")
    base_url: String,
    /// Shared HTTP client for connection pooling
    client: Client,
    /// Deadline for the model listing call
    status_timeout: Duration,
    /// Deadline for generate/chat calls
    request_timeout: Duration,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        client: Client,
        status_timeout: Duration,
        request_timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            status_timeout,
            request_timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check status and decode a JSON body, mapping failures to [`UpstreamError`].
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, UpstreamError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await.map_err(|e| {
            UpstreamError::InvalidResponse(format!("Failed to read {} body: {}", what, e))
        })?;
        serde_json::from_str(&body).map_err(|e| {
            UpstreamError::InvalidResponse(format!("Failed to parse {} response: {}", what, e))
        })
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| upstream_error_message(&body))
            .unwrap_or_else(|| status.to_string());
        Err(UpstreamError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

/// Ollama reports failures as `{"error": "..."}`; fall back to the raw body.
fn upstream_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    let parsed = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string));
    Some(parsed.unwrap_or_else(|| body.trim().to_string()))
}

#[async_trait]
impl LlmBackend for OllamaClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, UpstreamError> {
        let timeout_ms = self.status_timeout.as_millis() as u64;
        let response = self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.status_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_send(e, timeout_ms))?;

        let tags: TagsResponse = Self::decode(response, "tags").await?;
        Ok(tags.models.into_iter().map(ModelInfo::from).collect())
    }

    async fn generate(&self, body: GenerateBody) -> Result<GenerationResult, UpstreamError> {
        debug_assert!(!body.stream, "buffered generate called with stream=true");
        let timeout_ms = self.request_timeout.as_millis() as u64;
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_send(e, timeout_ms))?;

        let generated: GenerateResponse = Self::decode(response, "generate").await?;
        Ok(generated.into())
    }

    async fn generate_stream(&self, body: GenerateBody) -> Result<ByteStream, UpstreamError> {
        debug_assert!(body.stream, "streaming generate called with stream=false");
        let timeout_ms = self.request_timeout.as_millis() as u64;
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_send(e, timeout_ms))?;

        let response = Self::ensure_success(response).await?;

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| UpstreamError::Network(e.to_string())));

        Ok(Box::pin(stream))
    }

    async fn chat(&self, body: ChatBody) -> Result<ChatReply, UpstreamError> {
        let timeout_ms = self.request_timeout.as_millis() as u64;
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(&body)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_send(e, timeout_ms))?;

        let chat: ChatResponse = Self::decode(response, "chat").await?;
        Ok(chat.into())
    }
}
