//! HTTP clients for chat-completion services.

pub mod openai_client;

pub use openai_client::{BASE_URL_ENV, DEFAULT_BASE_URL, OpenAIClient};
