//! Request validation at the relay boundary.
//!
//! Invalid requests are rejected with 400 and never forwarded upstream.

use super::error::RelayError;
use super::types::{ChatRequest, GenerationRequest, Role};

fn validate_sampling(temperature: Option<f32>, max_tokens: Option<u32>) -> Result<(), RelayError> {
    if let Some(t) = temperature {
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(RelayError::invalid(format!(
                "temperature must be within [0, 1], got {}",
                t
            )));
        }
    }
    if max_tokens == Some(0) {
        return Err(RelayError::invalid("max_tokens must be positive"));
    }
    Ok(())
}

fn validate_model(model: Option<&str>) -> Result<(), RelayError> {
    match model {
        Some(m) if m.trim().is_empty() => Err(RelayError::invalid("model must not be empty")),
        _ => Ok(()),
    }
}

pub fn validate_generation(request: &GenerationRequest) -> Result<(), RelayError> {
    if request.prompt.trim().is_empty() {
        return Err(RelayError::invalid("prompt must not be empty"));
    }
    validate_model(request.model.as_deref())?;
    validate_sampling(request.temperature, request.max_tokens)
}

pub fn validate_chat(request: &ChatRequest) -> Result<(), RelayError> {
    if request.messages.is_empty() {
        return Err(RelayError::invalid("messages must not be empty"));
    }
    let has_user_content = request
        .messages
        .iter()
        .any(|m| m.role == Role::User && !m.content.trim().is_empty());
    if !has_user_content {
        return Err(RelayError::invalid(
            "messages must contain at least one non-empty user message",
        ));
    }
    validate_model(request.model.as_deref())?;
    validate_sampling(request.temperature, request.max_tokens)
}
