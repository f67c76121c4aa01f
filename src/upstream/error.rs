//! Error types for upstream operations.

use thiserror::Error;

/// Errors that can occur while talking to the upstream LLM server.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    /// Network connectivity error (DNS, connection refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Upstream answered with a non-success status.
    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Upstream body doesn't match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl UpstreamError {
    /// True when the upstream could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, UpstreamError::Network(_) | UpstreamError::Timeout(_))
    }

    pub(crate) fn from_send(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            UpstreamError::Timeout(timeout_ms)
        } else {
            UpstreamError::Network(error.to_string())
        }
    }
}
