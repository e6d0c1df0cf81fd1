//! Parsing of the free-form line that follows a magic name.

use clap::Parser;
use clap::error::ErrorKind;
use ipygpt_core::{IpygptError, Result};

/// Outcome of parsing a directive line.
#[derive(Debug)]
pub(crate) enum Directives<T> {
    Parsed(T),
    /// `--help` was requested; carries the rendered usage.
    Help(String),
}

/// Splits a line the way a shell would, so quoted values keep their spaces.
pub(crate) fn split_line(line: &str) -> Result<Vec<String>> {
    shlex::split(line.trim())
        .ok_or_else(|| IpygptError::directive(format!("unbalanced quotes in '{}'", line.trim())))
}

/// Parses `line` with the clap definition `T`, using `magic` as program name.
pub(crate) fn parse<T: Parser>(magic: &str, line: &str) -> Result<Directives<T>> {
    let args = split_line(line)?;
    match T::try_parse_from(std::iter::once(magic.to_string()).chain(args)) {
        Ok(parsed) => Ok(Directives::Parsed(parsed)),
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            Ok(Directives::Help(err.render().to_string()))
        }
        Err(err) => Err(IpygptError::directive(err.render().to_string().trim_end())),
    }
}
