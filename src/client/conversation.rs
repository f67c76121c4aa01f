//! Multi-turn conversation history kept on the caller's side.

use super::{ArkClient, ClientError};
use crate::api::types::{ChatMessage, ChatRequest, Role};

/// Ordered chat history for one caller.
///
/// The optional system prompt is placed at the head of the history on the
/// first send only. Assistant replies are recorded as they arrive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    system_prompt: Option<String>,
    model: Option<String>,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = (!prompt.trim().is_empty()).then_some(prompt);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        if self.messages.is_empty() {
            if let Some(prompt) = &self.system_prompt {
                self.messages
                    .push(ChatMessage::new(Role::System, prompt.clone()));
            }
        }
        self.messages.push(ChatMessage::new(Role::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::new(Role::Assistant, content));
    }

    /// Chat request for the current history.
    pub fn to_request(&self) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            ..ChatRequest::new(self.messages.clone())
        }
    }

    /// Append `content` as a user turn, send the history, and record the reply.
    ///
    /// On failure the history is rolled back so the same turn can be resent.
    pub async fn send(
        &mut self,
        client: &ArkClient,
        content: impl Into<String>,
    ) -> Result<&ChatMessage, ClientError> {
        let checkpoint = self.messages.len();
        self.push_user(content);

        match client.chat(&self.to_request()).await {
            Ok(reply) => {
                self.messages.push(reply.message);
                Ok(&self.messages[self.messages.len() - 1])
            }
            Err(e) => {
                self.messages.truncate(checkpoint);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[test]
    fn test_system_prompt_leads_first_turn_only() {
        let mut conversation = Conversation::new().with_system_prompt("You are terse.");
        conversation.push_user("hi");
        conversation.push_assistant("hello");
        conversation.push_user("again");

        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
    }

    #[test]
    fn test_blank_system_prompt_is_dropped() {
        let mut conversation = Conversation::new().with_system_prompt("   ");
        conversation.push_user("hi");
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn test_to_request_carries_model() {
        let mut conversation = Conversation::new().with_model("mistral:7b");
        conversation.push_user("hi");
        let request = conversation.to_request();
        assert_eq!(request.model.as_deref(), Some("mistral:7b"));
        assert!(request.has_user_message());
    }

    #[tokio::test]
    async fn test_send_records_reply() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/ollama")
            .match_body(Matcher::PartialJson(json!({
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "hi"}
                ]
            })))
            .with_status(200)
            .with_body(
                r#"{"message":{"role":"assistant","content":"Hello."},"model":"llama3:8b","created_at":"2024-05-01T10:20:30Z"}"#,
            )
            .create_async()
            .await;

        let client = ArkClient::new(server.url());
        let mut conversation = Conversation::new().with_system_prompt("Be brief.");
        let reply = conversation.send(&client, "hi").await.unwrap().clone();

        mock.assert_async().await;
        assert_eq!(reply.content, "Hello.");
        assert_eq!(conversation.messages().len(), 3);
    }

    #[tokio::test]
    async fn test_send_failure_rolls_back() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/api/ollama")
            .with_status(500)
            .with_body(r#"{"error":"Failed to chat","details":"timeout"}"#)
            .create_async()
            .await;

        let client = ArkClient::new(server.url());
        let mut conversation = Conversation::new().with_system_prompt("Be brief.");
        let result = conversation.send(&client, "hi").await;

        assert!(matches!(result, Err(ClientError::Status { status: 500, .. })));
        assert!(conversation.is_empty());
    }
}
