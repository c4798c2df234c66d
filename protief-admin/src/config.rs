//! Admin client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`AdminConfig::api_url`].
pub const API_URL_ENV: &str = "PROTIEF_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Base URL of the content API, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Origin the site is served from. `/uploads/...` paths are rewritten
    /// to the API origin when this differs from it.
    #[serde(default)]
    pub site_origin: Option<String>,

    /// Directory of the local content store
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Bound on the availability check
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,

    /// Bound on every other API call
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Shown for local image tokens whose payload is gone
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Largest image the admin accepts for upload
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            site_origin: None,
            store_path: default_store_path(),
            health_timeout_ms: default_health_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            placeholder_image: default_placeholder_image(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("protief-admin-data")
}

fn default_health_timeout_ms() -> u64 {
    3_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_placeholder_image() -> String {
    "https://via.placeholder.com/400x300/e5e7eb/6b7280?text=Bild+nicht+gefunden".to_string()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl AdminConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Applies `PROTIEF_API_URL` when it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = std::env::var(API_URL_ENV).ok().filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
