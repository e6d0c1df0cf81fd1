//! The extension host: owns both session contexts and runs magics.

use ipygpt_core::{
    ChatBackend, ChatConfig, DisplayAdapter, DisplayResult, IpygptError, Result, SessionContext,
};
use ipygpt_infrastructure::Dashboard;
use std::sync::Arc;

use crate::commands::{ChatCommand, ChatModelsBrowserCommand, ConfigCommand};
use crate::magic::MagicInvocation;

/// Runs magic invocations against two independent contexts.
///
/// `chat` keeps a conversation going; `exec` is the code-generation mode with
/// its own history and fixed system message. The two contexts share the API
/// key and default model (config changes are mirrored), nothing else.
pub struct MagicHost {
    chat_context: SessionContext,
    exec_context: SessionContext,
    backend: Arc<dyn ChatBackend>,
    display: Box<dyn DisplayAdapter>,
    dashboard: Dashboard,
}

impl MagicHost {
    /// Creates the host. `config` seeds the chat context; the exec context is
    /// derived from it.
    pub fn new(
        config: ChatConfig,
        backend: Arc<dyn ChatBackend>,
        display: Box<dyn DisplayAdapter>,
        dashboard: Dashboard,
    ) -> Self {
        let exec_context = SessionContext::new(config.for_exec());
        Self {
            chat_context: SessionContext::new(config),
            exec_context,
            backend,
            display,
            dashboard,
        }
    }

    pub fn chat_context(&self) -> &SessionContext {
        &self.chat_context
    }

    pub fn exec_context(&self) -> &SessionContext {
        &self.exec_context
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// `%%chat`: conversational prompt; each invocation is logged for the dashboard.
    pub async fn chat(&mut self, line: &str, cell: &str) -> DisplayResult {
        let result = ChatCommand::new(&mut self.chat_context, self.backend.as_ref())
            .execute(line, cell)
            .await;
        if let Err(e) = self.dashboard.record_chat(line, cell) {
            tracing::warn!(error = %e, "failed to append to chat log");
        }
        self.show(result)
    }

    /// `%%exec`: code-generation prompt in the exec context. Not logged.
    pub async fn exec(&mut self, line: &str, cell: &str) -> DisplayResult {
        let result = ChatCommand::new(&mut self.exec_context, self.backend.as_ref())
            .with_magic_name("%%exec")
            .execute(line, cell)
            .await;
        self.show(result)
    }

    /// `%chat_config`: updates the chat context and mirrors the shared keys
    /// into the exec context.
    pub fn chat_config(&mut self, line: &str) -> DisplayResult {
        let result = ConfigCommand::new(&mut self.chat_context).execute(line);
        if result.is_ok() {
            self.exec_context.config.api_key = self.chat_context.config.api_key.clone();
            self.exec_context.config.default_model =
                self.chat_context.config.default_model.clone();
        }
        self.show(result)
    }

    /// `%chat_models`
    pub async fn chat_models(&mut self, line: &str) -> DisplayResult {
        let result = ChatModelsBrowserCommand::new(&self.chat_context, self.backend.as_ref())
            .execute(line)
            .await;
        self.show(result)
    }

    /// Dispatches a parsed invocation to its magic.
    pub async fn run(&mut self, invocation: &MagicInvocation) -> DisplayResult {
        let cell = invocation.cell.as_deref().unwrap_or("");
        match invocation.name.as_str() {
            "chat" => self.chat(&invocation.line, cell).await,
            "exec" => self.exec(&invocation.line, cell).await,
            "chat_config" => self.chat_config(&invocation.line),
            "chat_models" => self.chat_models(&invocation.line).await,
            other => self.show(Err(IpygptError::directive(format!(
                "unknown magic '{other}'"
            )))),
        }
    }

    /// Parses and runs one cell of raw input. Plain text is sent to `%%chat`.
    pub async fn run_cell(&mut self, input: &str) -> DisplayResult {
        match MagicInvocation::parse(input) {
            Ok(Some(invocation)) => self.run(&invocation).await,
            Ok(None) => self.chat("", input).await,
            Err(e) => self.show(Err(e)),
        }
    }

    /// Stops the dashboard process.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.dashboard.shutdown().await
    }

    fn show(&self, result: Result<DisplayResult>) -> DisplayResult {
        let result = result.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "magic failed");
            DisplayResult::from(e)
        });
        self.display.render(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, RecordingDisplay};
    use ipygpt_infrastructure::DashboardSettings;
    use tempfile::TempDir;

    fn host(backend: FakeBackend, temp_dir: &TempDir) -> (MagicHost, RecordingDisplay) {
        let display = RecordingDisplay::default();
        let recorded = RecordingDisplay {
            rendered: display.rendered.clone(),
        };
        let dashboard = Dashboard::launch(&DashboardSettings {
            enabled: false,
            log_dir: temp_dir.path().to_path_buf(),
            ..DashboardSettings::default()
        })
        .unwrap();
        let config = ChatConfig {
            api_key: Some("sk-test".into()),
            ..ChatConfig::default()
        };
        (
            MagicHost::new(config, Arc::new(backend), Box::new(display), dashboard),
            recorded,
        )
    }

    #[tokio::test]
    async fn test_results_are_rendered() {
        let temp_dir = TempDir::new().unwrap();
        let (mut host, display) = host(FakeBackend::replying("hi"), &temp_dir);

        host.run_cell("%%chat\nhello").await;
        host.run_cell("%chat_config bogus=1").await;

        let rendered = display.rendered.lock().unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0], DisplayResult::Markdown("hi".into()));
        assert!(rendered[1].is_error());
    }

    #[tokio::test]
    async fn test_plain_text_goes_to_chat() {
        let temp_dir = TempDir::new().unwrap();
        let (mut host, _display) = host(FakeBackend::replying("hi"), &temp_dir);

        host.run_cell("just a question").await;
        assert_eq!(host.chat_context().history_len(), 2);
        assert_eq!(host.exec_context().history_len(), 0);
    }

    #[tokio::test]
    async fn test_config_mirrors_shared_keys_only() {
        let temp_dir = TempDir::new().unwrap();
        let (mut host, _display) = host(FakeBackend::replying("hi"), &temp_dir);

        host.chat_config(
            "api_key=sk-new default_model=gpt-4o \"default_system_message=Be brief.\"",
        );

        assert_eq!(host.exec_context().config.api_key.as_deref(), Some("sk-new"));
        assert_eq!(host.exec_context().config.default_model, "gpt-4o");
        assert_ne!(
            host.exec_context().config.default_system_message,
            host.chat_context().config.default_system_message
        );
        assert_eq!(host.chat_context().config.default_system_message, "Be brief.");
    }
}
