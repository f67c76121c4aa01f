//! Upstream LLM server configuration and request defaults

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Persona injected when a caller supplies no system instruction.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant in The Ark system. Be concise and helpful.";

/// Upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the Ollama server (e.g. "http://localhost:11434")
    pub base_url: String,
    /// Model used when a caller does not name one
    pub default_model: String,
    /// Case-insensitive substrings identifying the default model family
    pub default_model_patterns: Vec<String>,
    /// Default system preamble
    pub system_prompt: String,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
    /// Timeout for the model listing call behind a status check
    pub status_timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            default_model: "llama3:8b".to_string(),
            default_model_patterns: vec!["llama3".to_string(), "llama-3".to_string()],
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            default_temperature: 0.7,
            default_max_tokens: 2048,
            status_timeout_seconds: 5,
        }
    }
}

impl UpstreamConfig {
    /// Base URL without a trailing slash, ready for path joining.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "upstream.base_url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation {
                field: "upstream.base_url".to_string(),
                message: format!("expected an http(s) URL, got '{}'", self.base_url),
            });
        }
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "upstream.default_model".to_string(),
                message: "default model cannot be empty".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.default_temperature) {
            return Err(ConfigError::Validation {
                field: "upstream.default_temperature".to_string(),
                message: "temperature must be within [0, 1]".to_string(),
            });
        }
        if self.default_max_tokens == 0 {
            return Err(ConfigError::Validation {
                field: "upstream.default_max_tokens".to_string(),
                message: "max tokens must be positive".to_string(),
            });
        }
        Ok(())
    }
}
