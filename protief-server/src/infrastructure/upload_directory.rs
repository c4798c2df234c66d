use crate::infrastructure::file_names::sanitize_file_name;
use crate::port::ImageStore;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Flat directory of uploaded images.
pub struct UploadDirectory {
    root: PathBuf,
}

impl UploadDirectory {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `file_name` inside the directory. Only exact single-component
    /// names resolve.
    fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        match sanitize_file_name(file_name) {
            Some(clean) if clean == file_name => Some(self.root.join(clean)),
            _ => None,
        }
    }
}

#[async_trait]
impl ImageStore for UploadDirectory {
    async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let Some(path) = self.resolve(file_name) else {
            bail!("Invalid file name: {file_name:?}");
        };
        fs::create_dir_all(&self.root)
            .await
            .context("Failed to create uploads directory")?;
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    async fn get(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(file_name) else {
            return Ok(None);
        };
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}
