//! `%chat_models`: list the models the configured key can use.

use clap::Parser;
use ipygpt_core::{ChatBackend, DisplayResult, Result, SessionContext};

use super::directives::{self, Directives};

/// Directives accepted on the `%chat_models` line.
#[derive(Parser, Debug)]
#[command(about = "List available models", disable_version_flag = true)]
pub struct ModelsArgs {
    /// Include non-chat models (embeddings, audio, ...)
    #[arg(long)]
    pub all_models: bool,

    /// API key for this call only
    #[arg(long)]
    pub openai_api_key: Option<String>,
}

/// Lists models through the backend; never touches history.
pub struct ChatModelsBrowserCommand<'a> {
    context: &'a SessionContext,
    backend: &'a dyn ChatBackend,
}

impl<'a> ChatModelsBrowserCommand<'a> {
    pub fn new(context: &'a SessionContext, backend: &'a dyn ChatBackend) -> Self {
        Self { context, backend }
    }

    pub async fn execute(self, line: &str) -> Result<DisplayResult> {
        let args = match directives::parse::<ModelsArgs>("%chat_models", line)? {
            Directives::Parsed(args) => args,
            Directives::Help(usage) => return Ok(DisplayResult::Text(usage)),
        };

        let api_key = match &args.openai_api_key {
            Some(key) => key.as_str(),
            None => self.context.config.require_api_key()?,
        };

        let mut models = self.backend.list_models(api_key).await?;
        if !args.all_models {
            models.retain(|model| model.is_chat_model());
        }
        models.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!(count = models.len(), all = args.all_models, "listing models");

        Ok(DisplayResult::Models(models))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use ipygpt_core::{ChatConfig, IpygptError};

    fn context() -> SessionContext {
        SessionContext::new(ChatConfig {
            api_key: Some("sk-test".into()),
            ..ChatConfig::default()
        })
    }

    fn ids(result: DisplayResult) -> Vec<String> {
        match result {
            DisplayResult::Models(models) => models.into_iter().map(|m| m.id).collect(),
            other => panic!("expected models, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_default_lists_chat_models_sorted() {
        let backend = FakeBackend::replying("").with_models(&[
            "whisper-1",
            "gpt-4o",
            "text-embedding-3-small",
            "gpt-3.5-turbo",
        ]);
        let ctx = context();

        let result = ChatModelsBrowserCommand::new(&ctx, &backend)
            .execute("")
            .await
            .unwrap();

        assert_eq!(ids(result), vec!["gpt-3.5-turbo", "gpt-4o"]);
        assert_eq!(backend.model_keys(), vec!["sk-test"]);
    }

    #[tokio::test]
    async fn test_all_models_flag() {
        let backend = FakeBackend::replying("").with_models(&["whisper-1", "gpt-4o"]);
        let ctx = context();

        let result = ChatModelsBrowserCommand::new(&ctx, &backend)
            .execute("--all-models --openai-api-key sk-alt")
            .await
            .unwrap();

        assert_eq!(ids(result), vec!["gpt-4o", "whisper-1"]);
        assert_eq!(backend.model_keys(), vec!["sk-alt"]);
    }

    #[tokio::test]
    async fn test_missing_key_and_upstream_failure() {
        let backend = FakeBackend::replying("");
        let ctx = SessionContext::new(ChatConfig::default());
        let err = ChatModelsBrowserCommand::new(&ctx, &backend)
            .execute("")
            .await
            .unwrap_err();
        assert!(err.is_config());

        let backend = FakeBackend::failing(IpygptError::api(Some(401), "bad key"));
        let ctx = context();
        let err = ChatModelsBrowserCommand::new(&ctx, &backend)
            .execute("")
            .await
            .unwrap_err();
        assert!(err.is_api());
        assert_eq!(ctx.history_len(), 0);
    }
}
