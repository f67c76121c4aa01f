//! # Client Request Façade
//!
//! Typed async access to the relay endpoint. Every interactive surface (the
//! CLI commands, a UI, tests) goes through [`ArkClient`] instead of building
//! HTTP requests by hand.
//!
//! ```no_run
//! use ark::api::GenerationRequest;
//! use ark::client::ArkClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArkClient::new("http://127.0.0.1:3000");
//! let status = client.check_status().await;
//! if status.is_online() {
//!     let result = client.generate(&GenerationRequest::new("Say hello")).await?;
//!     println!("{}", result.response);
//! }
//! # Ok(())
//! # }
//! ```

pub mod conversation;
pub mod error;
pub mod interaction;
pub mod status_context;

pub use conversation::Conversation;
pub use error::ClientError;
pub use interaction::{Interaction, InteractionEvent, InteractionState, TransitionError};
pub use status_context::StatusContext;

use crate::api::types::{
    ChatReply, ChatRequest, ErrorBody, GenerationRequest, GenerationResult, StatusReport,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::api::RELAY_PATH;
use bytes::Bytes;
use futures::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Raw relay bytes of a streaming generation, in arrival order.
pub type ClientStream = BoxStream<'static, Result<Bytes, ClientError>>;

/// Façade over the relay endpoint.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ArkClient {
    endpoint: String,
    http: Client,
}

impl ArkClient {
    pub fn new(relay_base_url: impl Into<String>) -> Self {
        Self::with_http_client(relay_base_url, Client::new())
    }

    pub fn with_http_client(relay_base_url: impl Into<String>, http: Client) -> Self {
        let base = relay_base_url.into();
        Self {
            endpoint: format!("{}{}", base.trim_end_matches('/'), RELAY_PATH),
            http,
        }
    }

    /// Full URL of the relay endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the upstream status. Never fails.
    ///
    /// The relay answers an offline upstream with HTTP 500 and a report; that
    /// report is returned as-is. An unreachable relay yields an offline report
    /// carrying the transport error.
    pub async fn check_status(&self) -> StatusReport {
        let response = match self.http.get(&self.endpoint).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(endpoint = %self.endpoint, error = %e, "Relay unreachable");
                return StatusReport::offline(e.to_string());
            }
        };

        let status = response.status();
        match response.json::<StatusReport>().await {
            Ok(report) => report,
            Err(e) => StatusReport::offline(format!(
                "Unexpected status response ({}): {}",
                status.as_u16(),
                e
            )),
        }
    }

    /// Buffered generation. Forces `stream: false`.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ClientError> {
        let request = prepare_generation(request, false)?;
        let response = self.send(self.http.post(&self.endpoint).json(&request)).await?;
        decode(response).await
    }

    /// Streaming generation. Forces `stream: true`.
    ///
    /// Returns the relay's raw bytes; dropping the stream cancels the request.
    pub async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<ClientStream, ClientError> {
        let request = prepare_generation(request, true)?;
        let response = self.send(self.http.post(&self.endpoint).json(&request)).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ClientError::transport))
            .boxed())
    }

    /// Multi-turn chat.
    ///
    /// Rejected locally when the conversation holds no user message.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        if !request.has_user_message() {
            return Err(ClientError::InvalidInput(
                "conversation must contain at least one user message".into(),
            ));
        }
        let response = self.send(self.http.put(&self.endpoint).json(request)).await?;
        decode(response).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await.map_err(ClientError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let (error, details) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => (body.error, body.details),
            Err(_) if text.trim().is_empty() => (
                status.canonical_reason().unwrap_or("Unknown error").to_string(),
                None,
            ),
            Err(_) => (text, None),
        };
        Err(ClientError::Status {
            status: status.as_u16(),
            error,
            details,
        })
    }
}

fn prepare_generation(
    request: &GenerationRequest,
    stream: bool,
) -> Result<GenerationRequest, ClientError> {
    if request.prompt.trim().is_empty() {
        return Err(ClientError::InvalidInput("prompt must not be empty".into()));
    }
    let mut request = request.clone();
    request.stream = stream;
    request.max_tokens.get_or_insert(DEFAULT_MAX_TOKENS);
    request.temperature.get_or_insert(DEFAULT_TEMPERATURE);
    Ok(request)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(ClientError::transport)?;
    serde_json::from_slice(&bytes).map_err(ClientError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{ChatMessage, Role, ServiceState};
    use mockito::{Matcher, Server};
    use serde_json::json;

    const OFFLINE_BODY: &str = r#"{"state":"offline","availableModels":[],"hasDefaultModel":false,
        "message":"Ollama is not running. Start it with: ollama serve","error":"connection refused"}"#;

    #[test]
    fn test_endpoint_normalises_trailing_slash() {
        let client = ArkClient::new("http://localhost:3000/");
        assert_eq!(client.endpoint(), "http://localhost:3000/api/ollama");
    }

    #[tokio::test]
    async fn test_check_status_decodes_offline_500() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ollama")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(OFFLINE_BODY)
            .create_async()
            .await;

        let report = ArkClient::new(server.url()).check_status().await;

        assert_eq!(report.state, ServiceState::Offline);
        assert_eq!(report.error.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_check_status_unreachable_relay_is_offline() {
        let report = ArkClient::new("http://127.0.0.1:1").check_status().await;
        assert!(!report.is_online());
        assert!(report.available_models.is_empty());
        assert!(report.error.is_some());
    }

    #[tokio::test]
    async fn test_check_status_garbage_body_is_offline() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/ollama")
            .with_status(502)
            .with_body("<html>bad gateway</html>")
            .create_async()
            .await;

        let report = ArkClient::new(server.url()).check_status().await;
        assert!(!report.is_online());
        assert!(report.error.unwrap().contains("502"));
    }

    #[tokio::test]
    async fn test_generate_forces_buffered_and_fills_defaults() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ollama")
            .match_body(Matcher::PartialJson(json!({
                "prompt": "hello",
                "stream": false,
                "max_tokens": 2048,
            })))
            .with_status(200)
            .with_body(
                r#"{"response":"Hi","model":"llama3:8b","created_at":"2024-05-01T10:20:30Z","total_duration":5}"#,
            )
            .create_async()
            .await;

        let mut request = GenerationRequest::new("hello");
        request.stream = true;
        let result = ArkClient::new(server.url()).generate(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.response, "Hi");
        assert_eq!(result.total_duration, Some(5));
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_prompt_locally() {
        let result = ArkClient::new("http://127.0.0.1:1")
            .generate(&GenerationRequest::new("  "))
            .await;
        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_generate_maps_error_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/ollama")
            .with_status(500)
            .with_body(r#"{"error":"Failed to generate response","details":"Network error: refused"}"#)
            .create_async()
            .await;

        let err = ArkClient::new(server.url())
            .generate(&GenerationRequest::new("hello"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ClientError::Status {
                status: 500,
                error: "Failed to generate response".into(),
                details: Some("Network error: refused".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_generate_malformed_success_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/ollama")
            .with_status(200)
            .with_body(r#"{"unexpected":true}"#)
            .create_async()
            .await;

        let result = ArkClient::new(server.url())
            .generate(&GenerationRequest::new("hello"))
            .await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn test_generate_stream_yields_raw_bytes() {
        let body = "{\"response\":\"a\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n";
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ollama")
            .match_body(Matcher::PartialJson(json!({"stream": true})))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let stream = ArkClient::new(server.url())
            .generate_stream(&GenerationRequest::new("hello"))
            .await
            .unwrap();
        let chunks: Vec<Bytes> = stream.map(|c| c.unwrap()).collect().await;

        mock.assert_async().await;
        assert_eq!(chunks.concat(), body.as_bytes());
    }

    #[tokio::test]
    async fn test_chat_without_user_message_is_local_error() {
        let request = ChatRequest::new(vec![ChatMessage::new(Role::System, "be nice")]);
        let result = ArkClient::new("http://127.0.0.1:1").chat(&request).await;
        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_chat_uses_put() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/ollama")
            .with_status(200)
            .with_body(
                r#"{"message":{"role":"assistant","content":"Hi!"},"model":"llama3:8b","created_at":"2024-05-01T10:20:30Z"}"#,
            )
            .create_async()
            .await;

        let request = ChatRequest::new(vec![ChatMessage::new(Role::User, "hi")]);
        let reply = ArkClient::new(server.url()).chat(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(reply.message, ChatMessage::new(Role::Assistant, "Hi!"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/api/ollama")
            .with_status(405)
            .create_async()
            .await;

        let request = ChatRequest::new(vec![ChatMessage::new(Role::User, "hi")]);
        let err = ArkClient::new(server.url()).chat(&request).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 405, ref error, .. } if error == "Method Not Allowed"));
    }
}
