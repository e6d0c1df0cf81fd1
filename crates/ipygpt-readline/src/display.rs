//! Terminal display adapters.

use colored::Colorize;
use ipygpt_core::{DisplayAdapter, DisplayMode, DisplayResult};

/// Builds the adapter for the configured mode.
pub fn display_for(mode: DisplayMode) -> Box<dyn DisplayAdapter> {
    match mode {
        DisplayMode::Rich => Box::new(RichDisplay),
        DisplayMode::Plain => Box::new(PlainDisplay),
    }
}

/// Unstyled text, suitable for pipes and log capture.
pub struct PlainDisplay;

impl DisplayAdapter for PlainDisplay {
    fn render(&self, result: &DisplayResult) {
        println!("{}", format_plain(result));
    }
}

/// Coloured output; code blocks and headings in markdown replies are highlighted.
pub struct RichDisplay;

impl DisplayAdapter for RichDisplay {
    fn render(&self, result: &DisplayResult) {
        println!("{}", format_rich(result));
    }
}

pub fn format_plain(result: &DisplayResult) -> String {
    match result {
        DisplayResult::Markdown(text) | DisplayResult::Text(text) => text.trim_end().to_string(),
        DisplayResult::Models(models) if models.is_empty() => "No models found.".to_string(),
        DisplayResult::Models(models) => models
            .iter()
            .map(|model| match &model.owned_by {
                Some(owner) => format!("{}  ({owner})", model.id),
                None => model.id.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        DisplayResult::Config(view) => format!(
            "api_key: {}\ndefault_model: {}\ndefault_system_message: {}",
            view.api_key.as_deref().unwrap_or("(not set)"),
            view.default_model,
            view.default_system_message
        ),
        DisplayResult::Error { message, .. } => format!("Error: {message}"),
    }
}

pub fn format_rich(result: &DisplayResult) -> String {
    match result {
        DisplayResult::Markdown(text) => highlight_markdown(text),
        DisplayResult::Text(text) => text.trim_end().bright_black().to_string(),
        DisplayResult::Models(models) if models.is_empty() => {
            "No models found.".bright_black().to_string()
        }
        DisplayResult::Models(models) => models
            .iter()
            .map(|model| {
                let owner = model
                    .owned_by
                    .as_deref()
                    .map(|owner| format!("  ({owner})").bright_black().to_string())
                    .unwrap_or_default();
                format!("{}{owner}", model.id.bright_cyan().bold())
            })
            .collect::<Vec<_>>()
            .join("\n"),
        DisplayResult::Config(view) => [
            ("api_key", view.api_key.as_deref().unwrap_or("(not set)")),
            ("default_model", view.default_model.as_str()),
            (
                "default_system_message",
                view.default_system_message.as_str(),
            ),
        ]
        .iter()
        .map(|(key, value)| format!("{}: {value}", key.yellow()))
        .collect::<Vec<_>>()
        .join("\n"),
        DisplayResult::Error { message, .. } => format!("Error: {message}").red().to_string(),
    }
}

fn highlight_markdown(text: &str) -> String {
    let mut in_code = false;
    text.trim_end()
        .lines()
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_code = !in_code;
                line.bright_black().to_string()
            } else if in_code {
                line.bright_green().to_string()
            } else if line.starts_with('#') {
                line.bright_magenta().bold().to_string()
            } else {
                line.bright_blue().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipygpt_core::{ChatConfig, IpygptError, ModelInfo};

    #[test]
    fn test_plain_models() {
        let models = vec![
            ModelInfo {
                id: "gpt-4o".into(),
                owned_by: Some("system".into()),
                created: None,
            },
            ModelInfo {
                id: "gpt-3.5-turbo".into(),
                owned_by: None,
                created: None,
            },
        ];
        assert_eq!(
            format_plain(&DisplayResult::Models(models)),
            "gpt-4o  (system)\ngpt-3.5-turbo"
        );
        assert_eq!(
            format_plain(&DisplayResult::Models(Vec::new())),
            "No models found."
        );
    }

    #[test]
    fn test_plain_config_and_error() {
        let view = ChatConfig::default().view();
        let text = format_plain(&DisplayResult::Config(view));
        assert!(text.starts_with("api_key: (not set)\ndefault_model: gpt-3.5-turbo"));

        let err: DisplayResult = IpygptError::config("no API key").into();
        assert_eq!(format_plain(&err), "Error: Configuration error: no API key");
    }

    #[test]
    fn test_rich_keeps_content() {
        let reply = "# Title\nSome text\n```python\nprint(1)\n```";
        let rendered = format_rich(&DisplayResult::Markdown(reply.into()));
        for part in ["Title", "Some text", "print(1)", "```python"] {
            assert!(rendered.contains(part), "missing {part}");
        }
        assert_eq!(rendered.lines().count(), 5);
    }
}
