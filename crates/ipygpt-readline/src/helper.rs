use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use ipygpt_application::registered_magics;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

/// CLI helper for rustyline that provides magic completion, highlighting,
/// hints and multi-line cell input.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: registered_magics()
                .iter()
                .map(|magic| magic.invocation())
                .collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('%') && !line.contains(char::is_whitespace) {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_once('\n') {
            Some((first, rest)) if first.starts_with('%') => {
                Owned(format!("{}\n{}", first.bright_cyan(), rest))
            }
            None if line.starts_with('%') => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('%') && !line.contains(char::is_whitespace) {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(validate_cell(ctx.input()))
    }
}

/// A cell magic keeps reading until an empty line; everything else is one line.
fn validate_cell(input: &str) -> ValidationResult {
    if input.trim_start().starts_with("%%") && !input.ends_with('\n') {
        ValidationResult::Incomplete
    } else {
        ValidationResult::Valid(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_complete(input: &str) -> bool {
        matches!(validate_cell(input), ValidationResult::Valid(_))
    }

    #[test]
    fn test_cell_magic_waits_for_blank_line() {
        assert!(!is_complete("%%chat --model gpt-4o"));
        assert!(!is_complete("%%chat\nfirst line"));
        assert!(is_complete("%%chat\nfirst line\n"));
    }

    #[test]
    fn test_line_input_is_complete() {
        assert!(is_complete("%chat_config"));
        assert!(is_complete("what is rust?"));
        assert!(is_complete("quit"));
    }

    #[test]
    fn test_commands_follow_registry() {
        let helper = CliHelper::new();
        assert!(helper.commands.contains(&"%%chat".to_string()));
        assert!(helper.commands.contains(&"%chat_models".to_string()));
    }
}
