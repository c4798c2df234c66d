//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// JSON document served by `/api/content`
    #[serde(default = "default_content_file")]
    pub content_file: PathBuf,

    /// Directory receiving uploaded images
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// Public URL prefix of the uploads directory
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,

    /// Largest accepted multipart image
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Request body ceiling for every route
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            content_file: default_content_file(),
            uploads_dir: default_uploads_dir(),
            public_prefix: default_public_prefix(),
            max_upload_bytes: default_max_upload_bytes(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3001))
}

fn default_content_file() -> PathBuf {
    PathBuf::from("src/data/content.json")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("public/uploads")
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

impl ServerConfig {
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

    /// Public path of an uploaded file, e.g. `/uploads/hero-1-1700000000000.jpg`.
    pub fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix.trim_end_matches('/'), file_name)
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.listen.port(), 3001);
        assert_eq!(config.content_file, PathBuf::from("src/data/content.json"));
        assert_eq!(config.uploads_dir, PathBuf::from("public/uploads"));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_body_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn test_config_partial() {
        let config = ServerConfig::from_toml_str(
            r#"
listen = "0.0.0.0:8080"
uploads_dir = "/var/www/uploads"
"#,
        )
        .unwrap();
        assert_eq!(config.listen.port(), 8080);
        assert_eq!(config.uploads_dir, PathBuf::from("/var/www/uploads"));
        assert_eq!(config.public_prefix, "/uploads");
    }

    #[test]
    fn test_config_invalid_toml() {
        assert!(matches!(
            ServerConfig::from_toml_str("listen = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("server.toml");
        let mut config = ServerConfig::default();
        config.public_prefix = "/media/".into();
        config.to_file(&path).unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.public_path("a.png"), "/media/a.png");
    }
}
