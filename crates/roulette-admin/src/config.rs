//! Configuration for the admin client.
//!
//! Supports loading from a TOML file with environment variable overrides
//! for deployment-specific values and CLI overrides on top.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Configuration for the admin client.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the admin API.
    pub base_url: String,

    /// File holding the durable auth token.
    pub token_path: PathBuf,

    /// Directory export files are written into.
    pub export_dir: PathBuf,

    /// Logging level.
    pub log_level: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token_path: PathBuf::from("config/admin-token"),
            export_dir: PathBuf::from("."),
            log_level: "info".to_string(),
        }
    }
}

impl AdminConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TomlConfig = toml::from_str(content).context("Failed to parse TOML config")?;
        Ok(Self::from(file))
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ROULETTE_API_URL") {
            self.base_url = url;
        }
        if let Ok(path) = std::env::var("ROULETTE_TOKEN_PATH") {
            self.token_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("ROULETTE_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_cli_overrides(&mut self, api_url: Option<String>, export_dir: Option<PathBuf>) {
        if let Some(url) = api_url {
            self.base_url = url;
        }
        if let Some(dir) = export_dir {
            self.export_dir = dir;
        }
    }

    /// Validate configuration and return errors for invalid values.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            bail!("base_url must not be empty");
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("base_url must start with http:// or https://");
        }
        if self.token_path.as_os_str().is_empty() {
            bail!("token_path must not be empty");
        }
        Ok(())
    }
}

// ============================================================================
// TOML deserialization structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TomlConfig {
    api_url: String,
    token_path: String,
    export_dir: String,
    log_level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            token_path: "config/admin-token".to_string(),
            export_dir: ".".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl From<TomlConfig> for AdminConfig {
    fn from(toml: TomlConfig) -> Self {
        Self {
            base_url: toml.api_url,
            token_path: PathBuf::from(toml.token_path),
            export_dir: PathBuf::from(toml.export_dir),
            log_level: toml.log_level,
        }
    }
}
