// src/config.rs
//! Runtime configuration: where the UCB service lives and where the
//! session token is kept. Environment variables win over the optional
//! config file, which wins over built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

const STATE_DIR_NAME: &str = ".ucb-desk";
const CONFIG_FILE_NAME: &str = "config.toml";
const TOKEN_FILE_NAME: &str = "token";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub token_path: PathBuf,
}

/// Optional on-disk settings (`~/.ucb-desk/config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    token_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration for a run.
    pub fn load() -> Result<Self> {
        let state_dir = state_dir()?;
        let file = FileConfig::read_from(&state_dir.join(CONFIG_FILE_NAME))?;

        let base_url = std::env::var("UCB_API_BASE_URL")
            .ok()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token_path = std::env::var_os("UCB_TOKEN_FILE")
            .map(PathBuf::from)
            .or(file.token_file)
            .unwrap_or_else(|| state_dir.join(TOKEN_FILE_NAME));

        debug!("Using UCB service at {}", base_url);
        Ok(Self {
            base_url,
            token_path,
        })
    }

    /// Create the directory the session token lives in.
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }
        Ok(())
    }
}

impl FileConfig {
    /// Read the config file if it exists; a missing file is just defaults.
    fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// State directory holding the config file and session token. Defaults to
/// `~/.ucb-desk`, overridable through `UCB_DESK_DIR`.
fn state_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("UCB_DESK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .context("Cannot resolve the state directory: HOME is not set")?;
    Ok(home.join(STATE_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let file = FileConfig::read_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(file.base_url, None);
        assert_eq!(file.token_file, None);
    }

    #[test]
    fn test_config_file_settings_are_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "base_url = \"http://ucb.internal:9000/api/v1\"\ntoken_file = \"/tmp/ucb-token\"\n",
        )
        .unwrap();

        let file = FileConfig::read_from(&path).unwrap();
        assert_eq!(
            file.base_url.as_deref(),
            Some("http://ucb.internal:9000/api/v1")
        );
        assert_eq!(file.token_file, Some(PathBuf::from("/tmp/ucb-token")));
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [not toml").unwrap();

        let err = FileConfig::read_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
