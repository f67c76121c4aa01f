//! Upstream LLM server abstraction.
//!
//! The relay talks to the upstream through the [`LlmBackend`] trait so that
//! handlers stay independent of wire details. [`OllamaClient`] is the only
//! production implementation.

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

pub mod error;
pub mod ollama;
pub mod types;

pub use error::UpstreamError;
pub use ollama::OllamaClient;
pub use types::{ChatBody, GenerateBody, SamplingOptions};

use crate::api::types::{ChatReply, GenerationResult, ModelInfo};

/// Raw upstream bytes, forwarded in arrival order.
pub type ByteStream = BoxStream<'static, Result<Bytes, UpstreamError>>;

/// Interface to the upstream LLM server.
///
/// # Object Safety
///
/// Used as `Arc<dyn LlmBackend>` inside [`crate::api::AppState`]; async
/// methods go through `async_trait`.
///
/// # Cancellation Safety
///
/// Dropping any returned future or [`ByteStream`] aborts the in-flight
/// upstream request.
#[async_trait]
pub trait LlmBackend: Send + Sync + 'static {
    /// Base URL of the upstream, for logs and the liveness endpoint.
    fn base_url(&self) -> &str;

    /// List installed models in upstream order.
    ///
    /// # Returns
    ///
    /// - `Err(UpstreamError::Network | Timeout)` if the upstream is unreachable
    /// - `Err(UpstreamError::Upstream)` on a non-success status
    /// - `Err(UpstreamError::InvalidResponse)` if the listing can't be parsed
    async fn list_models(&self) -> Result<Vec<ModelInfo>, UpstreamError>;

    /// Buffered generation. `body.stream` must be false.
    async fn generate(&self, body: GenerateBody) -> Result<GenerationResult, UpstreamError>;

    /// Streaming generation. `body.stream` must be true.
    ///
    /// Errors before the first byte (connection, non-success status) are
    /// returned directly; errors mid-stream surface as stream items.
    async fn generate_stream(&self, body: GenerateBody) -> Result<ByteStream, UpstreamError>;

    /// Buffered multi-turn chat.
    async fn chat(&self, body: ChatBody) -> Result<ChatReply, UpstreamError>;
}
