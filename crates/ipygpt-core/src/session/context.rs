//! The mutable state threaded through every command of one conversation.

use crate::config::ChatConfig;

use super::message::ConversationMessage;

/// Config plus accumulated history for one conversational lineage.
///
/// The history is append-only: the only way to grow it is
/// [`SessionContext::record_exchange`], which commits a user prompt together
/// with the assistant reply.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub config: ChatConfig,
    message_history: Vec<ConversationMessage>,
}

impl SessionContext {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            message_history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ConversationMessage] {
        &self.message_history
    }

    pub fn history_len(&self) -> usize {
        self.message_history.len()
    }

    /// Appends one user/assistant pair.
    pub fn record_exchange(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.message_history.push(ConversationMessage::user(prompt));
        self.message_history.push(ConversationMessage::assistant(reply));
    }
}
