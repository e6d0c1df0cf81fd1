//! Chat log file and the dashboard process that tails it.
//!
//! The log is a streamlit script: a fixed header written once at startup,
//! then one appended block per `%%chat` invocation. The dashboard is an
//! external program started with the log path as its last argument and
//! supervised by [`DashboardProcess`].

use ipygpt_core::{IpygptError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};

use crate::paths::IpygptPaths;

pub const LOG_FILE_NAME: &str = "ipygpt_session.py";
const PROCESS_OUTPUT_FILE: &str = "dashboard.log";

/// Written once when the log is created.
pub const LOG_HEADER: &str = r#"
import streamlit as st

st.header("IPython GPT Chat Log")
"#;

/// Dashboard section of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardSettings {
    /// Spawn the dashboard process. The log is written either way.
    pub enabled: bool,
    /// Program and leading arguments; the log path is appended.
    pub command: Vec<String>,
    pub log_dir: PathBuf,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: vec!["streamlit".to_string(), "run".to_string()],
            log_dir: IpygptPaths::session_log_dir(),
        }
    }
}

/// Append-only chat log consumed by the dashboard.
#[derive(Debug, Clone)]
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    /// Creates `dir` if needed and (re)writes the log with [`LOG_HEADER`].
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        fs::write(&path, LOG_HEADER)?;
        tracing::debug!(path = %path.display(), "chat log initialized");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one chat entry.
    pub fn append_chat(&self, line: &str, cell: &str) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(render_entry(line, cell).as_bytes())?;
        Ok(())
    }
}

fn render_entry(line: &str, cell: &str) -> String {
    format!(
        "st.subheader(\"Chat Command\")\nst.markdown(\"\"\"Command: {}\n\nContents: {}\"\"\")\n\n",
        escape_triple_quoted(line),
        escape_triple_quoted(cell)
    )
}

/// Escapes text for a Python `"""..."""` literal.
///
/// Every quote is escaped: a value ending in `"` would otherwise merge with
/// the closing delimiter.
fn escape_triple_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A dashboard child process tied to this session.
///
/// The child is killed by [`DashboardProcess::shutdown`], and also when the
/// handle is dropped.
#[derive(Debug)]
pub struct DashboardProcess {
    child: Child,
}

impl DashboardProcess {
    /// Starts `command[0] command[1..] <log_path>`.
    ///
    /// Output goes to `dashboard.log` next to the chat log. Must be called
    /// from within a Tokio runtime.
    pub fn spawn(command: &[String], log_path: &Path) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| IpygptError::config("dashboard command is empty"))?;

        let output_path = log_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(PROCESS_OUTPUT_FILE);
        let output = File::create(&output_path)?;
        let errors = output.try_clone()?;

        let child = Command::new(program)
            .args(args)
            .arg(log_path)
            .stdin(Stdio::null())
            .stdout(Stdio::from(output))
            .stderr(Stdio::from(errors))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                IpygptError::process(format!("failed to launch dashboard '{program}': {e}"))
            })?;

        tracing::info!(program = %program, pid = ?child.id(), "dashboard started");
        Ok(Self { child })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Whether the child has not exited yet.
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kills the child (if still running) and reaps it.
    pub async fn shutdown(mut self) -> Result<()> {
        if self.is_running() {
            self.child
                .start_kill()
                .map_err(|e| IpygptError::process(format!("failed to stop dashboard: {e}")))?;
        }
        let status = self.child.wait().await?;
        tracing::info!(?status, "dashboard stopped");
        Ok(())
    }
}

/// The chat log plus its (optional) viewer process.
#[derive(Debug)]
pub struct Dashboard {
    log: ChatLog,
    process: Option<DashboardProcess>,
}

impl Dashboard {
    /// Writes the log header and, when enabled, starts the viewer.
    ///
    /// A launch failure is returned as-is; the session cannot start without it.
    pub fn launch(settings: &DashboardSettings) -> Result<Self> {
        let log = ChatLog::create(&settings.log_dir)?;
        let process = if settings.enabled {
            tracing::info!(log = %log.path().display(), "launching dashboard");
            Some(DashboardProcess::spawn(&settings.command, log.path())?)
        } else {
            None
        };
        Ok(Self { log, process })
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn process_mut(&mut self) -> Option<&mut DashboardProcess> {
        self.process.as_mut()
    }

    pub fn record_chat(&self, line: &str, cell: &str) -> Result<()> {
        self.log.append_chat(line, cell)
    }

    /// Stops the viewer, if any. The log file is left in place.
    pub async fn shutdown(&mut self) -> Result<()> {
        match self.process.take() {
            Some(process) => process.shutdown().await,
            None => Ok(()),
        }
    }
}
