//! Unified path management for ipygpt files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/ipygpt/            # Config directory (platform config dir)
//! ├── config.toml              # Persisted defaults
//! └── logs/                    # Application logs
//!     └── ipygpt.log.YYYY-MM-DD
//!
//! ./.ipygpt_tmp/               # Per-working-directory session log
//! ├── ipygpt_session.py        # Chat log tailed by the dashboard
//! └── dashboard.log            # Dashboard process output
//! ```

use std::path::PathBuf;

const APP_NAME: &str = "ipygpt";

/// Default folder (relative to the working directory) for the chat log.
pub const SESSION_LOG_DIR: &str = ".ipygpt_tmp";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path lookups for ipygpt.
pub struct IpygptPaths;

impl IpygptPaths {
    /// Returns the ipygpt configuration directory (e.g. `~/.config/ipygpt/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory for application (tracing) logs.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Returns the default chat-log directory, relative to the working directory.
    pub fn session_log_dir() -> PathBuf {
        PathBuf::from(SESSION_LOG_DIR)
    }
}
