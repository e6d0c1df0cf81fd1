//! The seam between magic commands and a remote chat-completion service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::{ConversationMessage, MessageRole};

/// A role/content pair as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl From<&ConversationMessage> for ChatMessage {
    fn from(message: &ConversationMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// One completion request, fully resolved from config and directives.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub api_key: String,
    pub model: String,
    /// System message first, then history, then the new prompt.
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// A model entry returned by the models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
}

impl ModelInfo {
    /// Whether this looks like a chat-completion model.
    pub fn is_chat_model(&self) -> bool {
        self.id.contains("gpt")
    }
}

/// Remote chat-completion API.
///
/// Implementations make exactly one attempt per call; failures are returned
/// as [`crate::IpygptError::Api`] and never retried.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends the request and returns the assistant reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// Lists the models visible to the given key.
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>>;
}
