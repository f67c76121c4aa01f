//! Errors surfaced by the client façade.

use thiserror::Error;

/// Errors returned by [`crate::client::ArkClient`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Relay could not be reached or the connection dropped.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Relay answered with a non-success status.
    #[error("Relay error {status}: {error}{}", details_suffix(.details))]
    Status {
        status: u16,
        error: String,
        details: Option<String>,
    },

    /// Relay body doesn't match the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request rejected locally, nothing was sent.
    #[error("Invalid request: {0}")]
    InvalidInput(String),
}

fn details_suffix(details: &Option<String>) -> String {
    details
        .as_deref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

impl ClientError {
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        ClientError::Transport(error.to_string())
    }

    pub(crate) fn decode(error: impl std::fmt::Display) -> Self {
        ClientError::Decode(error.to_string())
    }

    /// Underlying message the relay attached, if any.
    pub fn details(&self) -> Option<&str> {
        match self {
            ClientError::Status { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}
