//! Displayable command results and the display capability.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::backend::ModelInfo;
use crate::config::ConfigView;
use crate::error::IpygptError;

/// What a magic invocation hands to the active display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DisplayResult {
    /// Model reply, markdown formatted.
    Markdown(String),
    /// Plain informational text (usage, acknowledgements).
    Text(String),
    Models(Vec<ModelInfo>),
    Config(ConfigView),
    Error { kind: String, message: String },
}

impl DisplayResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<IpygptError> for DisplayResult {
    fn from(err: IpygptError) -> Self {
        Self::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Which display adapter the host installs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisplayMode {
    /// ANSI-coloured markdown.
    #[default]
    Rich,
    Plain,
}

/// Renders results into the host's output area.
///
/// Chosen once at startup; commands never know which one is active.
pub trait DisplayAdapter: Send + Sync {
    fn render(&self, result: &DisplayResult);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_keeps_kind() {
        let result: DisplayResult = IpygptError::config("no key").into();
        match result {
            DisplayResult::Error { kind, message } => {
                assert_eq!(kind, "config");
                assert!(message.contains("no key"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_display_mode_parse() {
        assert_eq!("RICH".parse::<DisplayMode>().unwrap(), DisplayMode::Rich);
        assert_eq!("plain".parse::<DisplayMode>().unwrap(), DisplayMode::Plain);
        assert!("html".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_value(DisplayResult::Text("ok".into())).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["value"], "ok");
    }
}
