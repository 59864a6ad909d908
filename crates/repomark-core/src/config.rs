//! Configuration types and loading.
//!
//! This module provides the configuration structure for repomark,
//! covering the API endpoint, search behavior and local persistence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration for repomark.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GitHub API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Search behavior settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Local persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent with every request.
    /// GitHub rejects requests that carry none.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// Search behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Milliseconds a query must stay unchanged before it is dispatched.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    /// The debounce window as a [`Duration`].
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Local persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding persisted state.
    /// Defaults to `repomark` under the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the directory holding persisted state.
    ///
    /// Falls back to `./.repomark` when the platform reports no data
    /// directory.
    #[must_use]
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir().map_or_else(|| PathBuf::from(".repomark"), |dir| dir.join("repomark"))
        })
    }
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("repomark/", env!("CARGO_PKG_VERSION")).to_string()
}

const fn default_debounce_ms() -> u64 {
    350
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// Default paths checked in order:
    /// 1. `$REPOMARK_CONFIG` environment variable
    /// 2. `./repomark.toml` (current directory)
    /// 3. `~/.config/repomark/repomark.toml` (Linux/macOS)
    /// 4. `%APPDATA%\repomark\repomark.toml` (Windows)
    ///
    /// If no configuration file exists, creates a default configuration file
    /// in the user's config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing an existing config fails.
    /// If config creation fails, returns default config with graceful degradation.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("REPOMARK_CONFIG") {
            return Self::load_from(Path::new(&path));
        }

        let local_config = PathBuf::from("repomark.toml");
        if local_config.exists() {
            return Self::load_from(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("repomark").join("repomark.toml");
            if user_config.exists() {
                return Self::load_from(&user_config);
            }

            // No config found - create default config file
            if let Err(e) = Self::create_default_config_file(&user_config) {
                tracing::warn!(
                    "Failed to create default config at {}: {}. Using in-memory defaults.",
                    user_config.display(),
                    e
                );
            } else {
                tracing::info!("Created default config at {}", user_config.display());
            }
        }

        // Return default configuration
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or parsing fails.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ConfigNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if directory or file creation fails.
    fn create_default_config_file(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let default_config = Self::default();
        let toml_content = toml::to_string_pretty(&default_config)
            .map_err(|e| Error::Config(format!("failed to serialize defaults: {e}")))?;
        std::fs::write(path, toml_content)?;

        Ok(())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.api.base_url.is_empty() {
            return Err(Error::Config("api.base_url cannot be empty".to_string()));
        }
        if self.api.user_agent.is_empty() {
            return Err(Error::Config("api.user_agent cannot be empty".to_string()));
        }
        Ok(())
    }
}
