//! Session state: messages and the per-context history.

mod context;
mod message;

pub use context::SessionContext;
pub use message::{ConversationMessage, MessageRole};
