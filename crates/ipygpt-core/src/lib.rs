pub mod backend;
pub mod config;
pub mod display;
pub mod error;
pub mod session;

// Re-export common error type
pub use error::{IpygptError, Result};

pub use backend::{ChatBackend, ChatMessage, ChatRequest, ModelInfo};
pub use config::{ChatConfig, ConfigKey, ConfigView};
pub use display::{DisplayAdapter, DisplayMode, DisplayResult};
pub use session::{ConversationMessage, MessageRole, SessionContext};
