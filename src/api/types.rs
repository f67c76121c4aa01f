//! Request and response types for the relay contract.
//!
//! The same types are used on both sides of the relay: handlers decode them
//! from callers, and [`crate::client::ArkClient`] encodes and decodes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature used when a caller leaves it unset.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Output token cap used when a caller leaves it unset.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// An installed upstream model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
    /// Opaque identity, stable across listings
    pub content_digest: String,
}

/// Reachability of the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Online,
    Offline,
}

/// Renderable upstream status. Built fresh per check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub state: ServiceState,
    #[serde(default)]
    pub available_models: Vec<ModelInfo>,
    #[serde(default)]
    pub has_default_model: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Remediation shown whenever the upstream can't be reached.
pub const OFFLINE_MESSAGE: &str = "Ollama is not running. Start it with: ollama serve";

impl StatusReport {
    /// Report for a reachable upstream.
    pub fn online(models: Vec<ModelInfo>, default_model: &str, patterns: &[String]) -> Self {
        let has_default_model = has_default_model(&models, patterns);
        let message = if has_default_model {
            format!("{} ready", default_model)
        } else {
            format!(
                "{} not found. Run: ollama pull {}",
                default_model, default_model
            )
        };
        Self {
            state: ServiceState::Online,
            available_models: models,
            has_default_model,
            message,
            error: None,
        }
    }

    /// Report for an unreachable upstream.
    pub fn offline(error: impl Into<String>) -> Self {
        Self {
            state: ServiceState::Offline,
            available_models: Vec::new(),
            has_default_model: false,
            message: OFFLINE_MESSAGE.to_string(),
            error: Some(error.into()),
        }
    }

    pub fn is_online(&self) -> bool {
        self.state == ServiceState::Online
    }

    /// Model a caller should use: the default when installed, otherwise the
    /// first listed model. None when offline or nothing is installed.
    pub fn preferred_model<'a>(&'a self, default_model: &'a str) -> Option<&'a str> {
        if !self.is_online() {
            return None;
        }
        if self.has_default_model {
            return Some(default_model);
        }
        self.available_models.first().map(|m| m.name.as_str())
    }
}

/// True iff any model name contains one of `patterns`, ignoring case.
pub fn has_default_model(models: &[ModelInfo], patterns: &[String]) -> bool {
    let patterns: Vec<String> = patterns.iter().map(|p| p.to_lowercase()).collect();
    models.iter().any(|model| {
        let name = model.name.to_lowercase();
        patterns.iter().any(|p| !p.is_empty() && name.contains(p.as_str()))
    })
}

/// One-shot generation request (`POST`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: bool,
    /// Overrides the configured default model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature: None,
            max_tokens: None,
            stream: false,
            model: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Buffered generation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub response: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
}

/// Multi-turn chat request (`PUT`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: None,
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn has_user_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::User)
    }
}

/// Assistant reply plus model and timing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: ChatMessage,
    pub model: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
}

/// Error envelope for generate and chat failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
