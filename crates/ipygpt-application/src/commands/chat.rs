//! `%%chat` / `%%exec`: send the cell to the model and record the exchange.

use clap::Parser;
use ipygpt_core::{
    ChatBackend, ChatMessage, ChatRequest, DisplayResult, IpygptError, MessageRole, Result,
    SessionContext,
};

use super::directives::{self, Directives};

/// Directives accepted on the `%%chat` line.
#[derive(Parser, Debug)]
#[command(
    about = "Send the cell to the chat model and display the reply",
    disable_version_flag = true
)]
pub struct ChatArgs {
    /// Model to use for this cell only
    #[arg(long)]
    pub model: Option<String>,

    /// System message for this cell only
    #[arg(long)]
    pub system_message: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// API key for this cell only
    #[arg(long)]
    pub openai_api_key: Option<String>,

    /// Do not send earlier messages (the exchange is still recorded)
    #[arg(long)]
    pub no_history: bool,
}

fn parse_temperature(raw: &str) -> std::result::Result<f32, String> {
    let value: f32 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside 0.0..=2.0"))
    }
}

/// Sends a cell to the completion API using one session context.
pub struct ChatCommand<'a> {
    context: &'a mut SessionContext,
    backend: &'a dyn ChatBackend,
    magic: &'static str,
}

impl<'a> ChatCommand<'a> {
    pub fn new(context: &'a mut SessionContext, backend: &'a dyn ChatBackend) -> Self {
        Self {
            context,
            backend,
            magic: "%%chat",
        }
    }

    /// Name shown in usage and error text (`%%exec` for the exec context).
    pub fn with_magic_name(mut self, magic: &'static str) -> Self {
        self.magic = magic;
        self
    }

    /// Runs the command.
    ///
    /// On success the history has grown by exactly one user and one assistant
    /// message. On any failure it is unchanged.
    pub async fn execute(self, line: &str, cell: &str) -> Result<DisplayResult> {
        let args = match directives::parse::<ChatArgs>(self.magic, line)? {
            Directives::Parsed(args) => args,
            Directives::Help(usage) => return Ok(DisplayResult::Text(usage)),
        };

        let prompt = cell.trim();
        if prompt.is_empty() {
            return Err(IpygptError::directive(format!(
                "{} needs a prompt in the cell body",
                self.magic
            )));
        }

        let request = self.build_request(&args, prompt)?;
        tracing::info!(
            magic = self.magic,
            model = %request.model,
            messages = request.messages.len(),
            "chat request"
        );

        let reply = self.backend.complete(&request).await?;
        self.context.record_exchange(prompt, reply.clone());
        Ok(DisplayResult::Markdown(reply))
    }

    fn build_request(&self, args: &ChatArgs, prompt: &str) -> Result<ChatRequest> {
        let config = &self.context.config;
        let api_key = match &args.openai_api_key {
            Some(key) => key.clone(),
            None => config.require_api_key()?.to_string(),
        };

        let system_message = args
            .system_message
            .clone()
            .unwrap_or_else(|| config.default_system_message.clone());

        let mut messages = vec![ChatMessage {
            role: MessageRole::System,
            content: system_message,
        }];
        if !args.no_history {
            messages.extend(self.context.history().iter().map(ChatMessage::from));
        }
        messages.push(ChatMessage {
            role: MessageRole::User,
            content: prompt.to_string(),
        });

        Ok(ChatRequest {
            api_key,
            model: args
                .model
                .clone()
                .unwrap_or_else(|| config.default_model.clone()),
            messages,
            temperature: args.temperature,
            max_tokens: args.max_tokens,
        })
    }
}
