//! Content document kept in one pretty-printed JSON file.

use crate::port::ContentStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct JsonFileContentStore {
    path: PathBuf,
}

impl JsonFileContentStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next write goes to before it is renamed into place.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "content.json".to_string());
        self.path
            .with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4()))
    }
}

#[async_trait]
impl ContentStore for JsonFileContentStore {
    async fn load(&self) -> Result<Value> {
        let raw = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&raw).context("Failed to parse content document")
    }

    async fn save(&self, document: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create content directory")?;
        }

        let body =
            serde_json::to_vec_pretty(document).context("Failed to serialize content document")?;
        self.replace_via(&self.temp_path(), &body).await
    }
}

impl JsonFileContentStore {
    /// Writes `body` to `temp` and renames it over the document. `temp` is
    /// gone afterwards whether or not this succeeds.
    async fn replace_via(&self, temp: &Path, body: &[u8]) -> Result<()> {
        if let Err(e) = fs::write(temp, body).await {
            let _ = fs::remove_file(temp).await;
            return Err(e).with_context(|| format!("Failed to write {}", temp.display()));
        }

        if let Err(e) = fs::rename(temp, &self.path).await {
            let _ = fs::remove_file(temp).await;
            return Err(e).context("Failed to replace content document");
        }
        Ok(())
    }
}
