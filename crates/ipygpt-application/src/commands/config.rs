//! `%chat_config`: show or update the context configuration.

use ipygpt_core::config::EXEC_SYSTEM_MESSAGE;
use ipygpt_core::{ConfigKey, DisplayResult, IpygptError, Result, SessionContext};

use super::directives;

/// Applies `key=value` directives to a context's config.
///
/// Unknown keys are rejected and nothing is applied unless every directive
/// on the line is valid.
pub struct ConfigCommand<'a> {
    context: &'a mut SessionContext,
}

impl<'a> ConfigCommand<'a> {
    pub fn new(context: &'a mut SessionContext) -> Self {
        Self { context }
    }

    /// With an empty line, shows the current config (key masked).
    pub fn execute(self, line: &str) -> Result<DisplayResult> {
        let updates = parse_updates(line)?;

        let mut config = self.context.config.clone();
        for (key, value) in updates {
            if key == ConfigKey::DefaultSystemMessage && value.trim() == EXEC_SYSTEM_MESSAGE {
                return Err(IpygptError::directive(
                    "that system message is reserved for %%exec",
                ));
            }
            config.set(key, value)?;
            tracing::info!(key = %key, "config updated");
        }
        self.context.config = config;

        Ok(DisplayResult::Config(self.context.config.view()))
    }
}

fn parse_updates(line: &str) -> Result<Vec<(ConfigKey, String)>> {
    directives::split_line(line)?
        .into_iter()
        .map(|token| {
            let (key, value) = token.split_once('=').ok_or_else(|| {
                IpygptError::directive(format!("expected key=value, got '{token}'"))
            })?;
            Ok((ConfigKey::parse(key)?, value.to_string()))
        })
        .collect()
}
