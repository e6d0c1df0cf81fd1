//! Config file storage.
//!
//! Reads `config.toml` into a [`FileConfig`]. The file is optional; a missing
//! or empty file yields the defaults.

use ipygpt_core::{ChatConfig, DisplayMode, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::dashboard::DashboardSettings;

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub display: Option<DisplayMode>,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

impl FileConfig {
    /// Layers this file over `base` (env-derived defaults).
    ///
    /// A key from the file wins over one from the environment.
    pub fn apply_to(&self, base: ChatConfig) -> ChatConfig {
        ChatConfig {
            api_key: self
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .or(base.api_key),
            default_model: self
                .default_model
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(base.default_model),
            default_system_message: base.default_system_message,
        }
    }
}

/// Read access to `config.toml`.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a new config storage handle.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the config file (usually `config.toml`)
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the config file.
    ///
    /// # Returns
    ///
    /// - `Ok(FileConfig)`: parsed file, or defaults when the file is missing or empty
    /// - `Err`: an IO error, or a serialization error for malformed TOML
    pub fn load(&self) -> Result<FileConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(FileConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(FileConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));

        let config = storage.load().expect("Should load defaults");
        assert_eq!(config, FileConfig::default());
        assert!(config.dashboard.enabled);
    }

    #[test]
    fn test_load_full_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
api_key = "sk-from-file"
default_model = "gpt-4o"
display = "plain"

[dashboard]
enabled = false
command = ["python", "-m", "streamlit", "run"]
log_dir = "/tmp/ipygpt-logs"
"#,
        )
        .unwrap();

        let config = ConfigStorage::new(path).load().expect("Should parse");
        assert_eq!(config.api_key.as_deref(), Some("sk-from-file"));
        assert_eq!(config.display, Some(DisplayMode::Plain));
        assert!(!config.dashboard.enabled);
        assert_eq!(config.dashboard.command[0], "python");
        assert_eq!(config.dashboard.log_dir, PathBuf::from("/tmp/ipygpt-logs"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "temperature = 0.2\n").unwrap();

        let err = ConfigStorage::new(path).load().unwrap_err();
        assert_eq!(err.kind(), "serialization");
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_empty_file_values_keep_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "api_key = \"\"\ndefault_model = \"  \"\n").unwrap();

        let file = ConfigStorage::new(path).load().expect("Should parse");
        let merged = file.apply_to(ChatConfig::default());
        assert_eq!(merged, ChatConfig::default());
    }

    #[test]
    fn test_file_key_wins_over_env_key() {
        let base = ChatConfig {
            api_key: Some("sk-env".into()),
            ..ChatConfig::default()
        };
        let file = FileConfig {
            api_key: Some("sk-file".into()),
            ..FileConfig::default()
        };
        let merged = file.apply_to(base.clone());
        assert_eq!(merged.api_key.as_deref(), Some("sk-file"));
        assert_eq!(merged.default_model, base.default_model);

        let merged = FileConfig::default().apply_to(base);
        assert_eq!(merged.api_key.as_deref(), Some("sk-env"));
    }
}
