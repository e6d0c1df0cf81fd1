//! Error types for ipygpt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every ipygpt crate.
///
/// Command failures never abort the session: the host turns each of these
/// into a displayed error result.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IpygptError {
    /// Missing or invalid configuration (e.g. no API key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed magic directive line or body
    #[error("Invalid directive: {0}")]
    Directive(String),

    /// Upstream API failure
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML"
        message: String,
    },

    /// Child process error (dashboard)
    #[error("Process error: {0}")]
    Process(String),
}

impl IpygptError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Directive error
    pub fn directive(message: impl Into<String>) -> Self {
        Self::Directive(message.into())
    }

    /// Creates an Api error
    pub fn api(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Process error
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a directive error
    pub fn is_directive(&self) -> bool {
        matches!(self, Self::Directive(_))
    }

    /// Check if this is an upstream API error
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Short label used by displays ("config", "api", ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Directive(_) => "directive",
            Self::Api { .. } => "api",
            Self::Io { .. } => "io",
            Self::Serialization { .. } => "serialization",
            Self::Process(_) => "process",
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for IpygptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<toml::de::Error> for IpygptError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, IpygptError>`.
pub type Result<T> = std::result::Result<T, IpygptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_includes_status() {
        let err = IpygptError::api(Some(429), "rate limited");
        assert_eq!(err.to_string(), "API error (429): rate limited");

        let err = IpygptError::api(None, "connection refused");
        assert_eq!(err.to_string(), "API error: connection refused");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(IpygptError::config("x").kind(), "config");
        assert_eq!(IpygptError::directive("x").kind(), "directive");
        assert!(IpygptError::config("x").is_config());
        assert!(!IpygptError::directive("x").is_config());
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Table>("key = ").unwrap_err();
        let err: IpygptError = toml_err.into();
        assert_eq!(err.kind(), "serialization");
        assert!(err.to_string().starts_with("Serialization error: TOML - "));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: IpygptError = io.into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("NotFound"));
    }
}
