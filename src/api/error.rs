//! Relay error taxonomy and its HTTP mapping.

use super::types::ErrorBody;
use crate::upstream::UpstreamError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Relay operation that failed; selects the generic error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Chat,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Generate => "Failed to generate response",
            Operation::Chat => "Failed to chat",
        }
    }
}

/// Failure classes reported by the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UpstreamUnreachable,
    UpstreamMalformedResponse,
    CallerInputInvalid,
}

/// Errors returned by the generate and chat handlers.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Request rejected before anything was sent upstream.
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// The upstream call failed.
    #[error("{}: {source}", .operation.failure_message())]
    Upstream {
        operation: Operation,
        #[source]
        source: UpstreamError,
    },
}

impl RelayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        RelayError::InvalidInput(message.into())
    }

    pub fn upstream(operation: Operation, source: UpstreamError) -> Self {
        RelayError::Upstream { operation, source }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            RelayError::InvalidInput(_) => FailureKind::CallerInputInvalid,
            RelayError::Upstream { source, .. } if source.is_unreachable() => {
                FailureKind::UpstreamUnreachable
            }
            RelayError::Upstream { .. } => FailureKind::UpstreamMalformedResponse,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            FailureKind::CallerInputInvalid => StatusCode::BAD_REQUEST,
            FailureKind::UpstreamUnreachable | FailureKind::UpstreamMalformedResponse => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            RelayError::InvalidInput(details) => ErrorBody {
                error: "Invalid request".to_string(),
                details: Some(details.clone()),
            },
            RelayError::Upstream { operation, source } => ErrorBody {
                error: operation.failure_message().to_string(),
                details: Some(source.to_string()),
            },
        }
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        RelayError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
