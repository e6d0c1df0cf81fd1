//! Session configuration: the fixed key set carried by every context.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{IpygptError, Result};

/// Environment variable consulted when no key is otherwise configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// System prompt of the conversational `chat` context.
pub const CHAT_SYSTEM_MESSAGE: &str =
    "You are an expert python developer assistant who favors concise, specific code examples.";

/// System prompt of the single-shot `exec` context.
pub const EXEC_SYSTEM_MESSAGE: &str = "Ignore previous directions. You are an expert python developer who favors variable type annotations. Reply with a single code-block and use concise docstrings. Include one test case.";

/// The configuration keys a context understands. Nothing outside this set
/// is ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum ConfigKey {
    #[strum(to_string = "api_key", serialize = "openai_api_key")]
    ApiKey,
    #[strum(to_string = "default_model")]
    DefaultModel,
    #[strum(to_string = "default_system_message")]
    DefaultSystemMessage,
}

impl ConfigKey {
    /// Parses a user-typed key, accepting `--default-model`, `default-model`
    /// and `default_model` alike.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().trim_start_matches("--").replace('-', "_");
        ConfigKey::from_str(&normalized).map_err(|_| {
            let known: Vec<String> = ConfigKey::iter().map(|k| k.to_string()).collect();
            IpygptError::directive(format!(
                "unknown configuration key '{}' (expected one of: {})",
                raw.trim(),
                known.join(", ")
            ))
        })
    }
}

/// Per-context configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub default_model: String,
    pub default_system_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            default_system_message: CHAT_SYSTEM_MESSAGE.to_string(),
        }
    }
}

impl ChatConfig {
    /// Builds the chat-context defaults, taking the API key from `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
            ..Self::default()
        }
    }

    /// Copy of this config carrying the exec-mode system prompt.
    pub fn for_exec(&self) -> Self {
        Self {
            default_system_message: EXEC_SYSTEM_MESSAGE.to_string(),
            ..self.clone()
        }
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::ApiKey => self.api_key.as_deref(),
            ConfigKey::DefaultModel => Some(&self.default_model),
            ConfigKey::DefaultSystemMessage => Some(&self.default_system_message),
        }
    }

    /// Sets a key. Empty values are rejected; the key set never shrinks.
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IpygptError::directive(format!("value for '{key}' is empty")));
        }
        match key {
            ConfigKey::ApiKey => self.api_key = Some(value),
            ConfigKey::DefaultModel => self.default_model = value,
            ConfigKey::DefaultSystemMessage => self.default_system_message = value,
        }
        Ok(())
    }

    /// Returns the API key or a configuration error naming where to set it.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            IpygptError::config(format!(
                "no API key configured; set {API_KEY_ENV} or run `%chat_config api_key=<key>`"
            ))
        })
    }

    /// Display-safe snapshot of this config.
    pub fn view(&self) -> ConfigView {
        ConfigView {
            api_key: self.api_key.as_deref().map(mask_secret),
            default_model: self.default_model.clone(),
            default_system_message: self.default_system_message.clone(),
        }
    }
}

/// Config as shown to the user; the key is masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigView {
    pub api_key: Option<String>,
    pub default_model: String,
    pub default_system_message: String,
}

/// Keeps the first three and last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
