//! Configuration module for the Ark relay
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ARK_*`, `OLLAMA_BASE_URL`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use ark::config::ArkConfig;
//!
//! // Load defaults
//! let config = ArkConfig::default();
//! assert_eq!(config.server.port, 3000);
//! assert_eq!(config.upstream.base_url, "http://localhost:11434");
//!
//! // Parse from TOML
//! let toml = r#"
//! [upstream]
//! default_model = "mistral:7b"
//! "#;
//! let config: ArkConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.upstream.default_model, "mistral:7b");
//! ```

pub mod error;
pub mod logging;
pub mod server;
pub mod upstream;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable selecting the upstream Ollama base URL.
pub const UPSTREAM_URL_ENV: &str = "OLLAMA_BASE_URL";

/// Unified configuration for the Ark relay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArkConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Upstream LLM server and request defaults
    pub upstream: UpstreamConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ArkConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(UPSTREAM_URL_ENV) {
            if !url.trim().is_empty() {
                self.upstream.base_url = url;
            }
        }
        if let Some(model) = lookup("ARK_DEFAULT_MODEL") {
            if !model.trim().is_empty() {
                self.upstream.default_model = model;
            }
        }

        // Server settings
        if let Some(port) = lookup("ARK_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Some(host) = lookup("ARK_HOST") {
            self.server.host = host;
        }

        // Logging settings
        if let Some(level) = lookup("ARK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ARK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }

        self.upstream.validate()
    }
}
