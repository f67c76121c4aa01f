//! Field helpers for structured logging

use crate::api::types::{ChatMessage, Role};

const PREVIEW_CHARS: usize = 100;

/// Truncated prompt preview, or None when content logging is disabled.
///
/// # Examples
///
/// ```
/// use ark::logging::truncate_prompt;
///
/// assert_eq!(truncate_prompt("hello", false), None);
/// assert_eq!(truncate_prompt("hello", true).as_deref(), Some("hello"));
/// ```
pub fn truncate_prompt(prompt: &str, enable_content_logging: bool) -> Option<String> {
    if !enable_content_logging || prompt.is_empty() {
        return None;
    }
    Some(truncate_chars(prompt, PREVIEW_CHARS))
}

/// Preview of the latest user message in a conversation.
pub fn preview_chat(messages: &[ChatMessage], enable_content_logging: bool) -> Option<String> {
    let last_user = messages.iter().rev().find(|m| m.role == Role::User)?;
    truncate_prompt(&last_user.content, enable_content_logging)
}

/// Truncate on a char boundary.
fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
