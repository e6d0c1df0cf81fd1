//! Magic invocation syntax.
//!
//! A cell magic is `%%name <line>` followed by a body (the rest of the cell);
//! a line magic is a single `%name <line>`.

use ipygpt_core::{IpygptError, Result};

/// Whether a magic takes a cell body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicKind {
    Cell,
    Line,
}

/// A registered magic.
#[derive(Debug, Clone, Copy)]
pub struct MagicSpec {
    pub name: &'static str,
    pub kind: MagicKind,
    pub usage: &'static str,
    pub description: &'static str,
}

impl MagicSpec {
    /// The name as typed, with its `%`/`%%` prefix.
    pub fn invocation(&self) -> String {
        match self.kind {
            MagicKind::Cell => format!("%%{}", self.name),
            MagicKind::Line => format!("%{}", self.name),
        }
    }
}

const MAGICS: &[MagicSpec] = &[
    MagicSpec {
        name: "chat",
        kind: MagicKind::Cell,
        usage: "%%chat [--model M] [--system-message S] [--temperature T] [--max-tokens N] [--openai-api-key K] [--no-history]",
        description: "Continue the conversation with the cell as the next prompt",
    },
    MagicSpec {
        name: "exec",
        kind: MagicKind::Cell,
        usage: "%%exec [--model M] [--system-message S] [--temperature T] [--max-tokens N] [--openai-api-key K] [--no-history]",
        description: "Generate code for the cell in a separate, code-only conversation",
    },
    MagicSpec {
        name: "chat_config",
        kind: MagicKind::Line,
        usage: "%chat_config [key=value ...]",
        description: "Show or set api_key, default_model, default_system_message",
    },
    MagicSpec {
        name: "chat_models",
        kind: MagicKind::Line,
        usage: "%chat_models [--all-models] [--openai-api-key K]",
        description: "List the models available to the configured key",
    },
];

/// Returns all registered magics.
pub fn registered_magics() -> &'static [MagicSpec] {
    MAGICS
}

/// One parsed magic invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicInvocation {
    pub kind: MagicKind,
    pub name: String,
    pub line: String,
    /// Body for cell magics; `None` for line magics.
    pub cell: Option<String>,
}

impl MagicInvocation {
    /// Parses one cell of input.
    ///
    /// Returns `Ok(None)` for text that is not a magic at all, and a
    /// directive error for a magic that is not registered.
    pub fn parse(input: &str) -> Result<Option<Self>> {
        let input = input.trim_start();
        let (first, rest) = match input.split_once('\n') {
            Some((first, rest)) => (first, Some(rest)),
            None => (input, None),
        };

        let (kind, header) = if let Some(header) = first.strip_prefix("%%") {
            (MagicKind::Cell, header)
        } else if let Some(header) = first.strip_prefix('%') {
            (MagicKind::Line, header)
        } else {
            return Ok(None);
        };

        let (name, line) = match header.trim().split_once(char::is_whitespace) {
            Some((name, line)) => (name, line.trim()),
            None => (header.trim(), ""),
        };

        let magic = registered_magics()
            .iter()
            .find(|magic| magic.name == name)
            .ok_or_else(|| IpygptError::directive(format!("unknown magic '{}'", first.trim())))?;

        if magic.kind != kind {
            return Err(IpygptError::directive(format!(
                "'{}' is used as {}",
                first.trim(),
                magic.invocation()
            )));
        }

        let cell = match kind {
            MagicKind::Cell => Some(rest.unwrap_or("").trim_end().to_string()),
            MagicKind::Line => {
                if rest.is_some_and(|body| !body.trim().is_empty()) {
                    return Err(IpygptError::directive(format!(
                        "{} is a line magic and takes no cell body",
                        magic.invocation()
                    )));
                }
                None
            }
        };

        Ok(Some(Self {
            kind,
            name: name.to_string(),
            line: line.to_string(),
            cell,
        }))
    }
}

/// Splits a script into cells. Every line starting with `%` opens a new cell;
/// blank lines and `#` comments before the first magic are skipped.
pub fn split_cells(script: &str) -> Vec<String> {
    let mut cells: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in script.lines() {
        if line.starts_with('%') {
            if let Some(cell) = current.take() {
                cells.push(cell);
            }
            current = Some(line.to_string());
        } else if let Some(cell) = current.as_mut() {
            cell.push('\n');
            cell.push_str(line);
        } else if !line.trim().is_empty() && !line.trim_start().starts_with('#') {
            // stray text before any magic becomes its own cell
            cells.push(line.to_string());
        }
    }
    if let Some(cell) = current {
        cells.push(cell);
    }

    cells
        .into_iter()
        .map(|cell| cell.trim_end().to_string())
        .collect()
}
