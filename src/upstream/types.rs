//! Native Ollama wire types.
//!
//! These mirror the upstream REST API (`/api/tags`, `/api/generate`,
//! `/api/chat`) and never leave this crate's relay layer; callers see the
//! reshaped types in [`crate::api::types`].

use crate::api::types::{ChatMessage, ChatReply, GenerationResult, ModelInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /api/tags` response.
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagModel>,
}

/// One installed model as listed by `/api/tags`.
#[derive(Debug, Deserialize)]
pub struct TagModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub digest: String,
}

impl From<TagModel> for ModelInfo {
    fn from(model: TagModel) -> Self {
        ModelInfo {
            name: model.name,
            size_bytes: model.size,
            last_modified: model.modified_at,
            content_digest: model.digest,
        }
    }
}

/// Sampling options shared by generate and chat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

/// `POST /api/generate` body.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBody {
    pub model: String,
    pub prompt: String,
    pub system: String,
    pub stream: bool,
    pub options: SamplingOptions,
}

/// `POST /api/chat` body. Always sent with `stream: false`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub options: SamplingOptions,
}

/// Buffered `/api/generate` response (fields the relay keeps).
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub response: String,
    #[serde(default)]
    pub total_duration: Option<u64>,
}

impl From<GenerateResponse> for GenerationResult {
    fn from(r: GenerateResponse) -> Self {
        GenerationResult {
            response: r.response,
            model: r.model,
            created_at: r.created_at,
            total_duration: r.total_duration,
        }
    }
}

/// Buffered `/api/chat` response.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub message: ChatMessage,
    #[serde(default)]
    pub total_duration: Option<u64>,
}

impl From<ChatResponse> for ChatReply {
    fn from(r: ChatResponse) -> Self {
        ChatReply {
            message: r.message,
            model: r.model,
            created_at: r.created_at,
            total_duration: r.total_duration,
        }
    }
}
