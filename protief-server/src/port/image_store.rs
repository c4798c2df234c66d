use anyhow::Result;
use async_trait::async_trait;

/// Storage of uploaded image files, addressed by a single file name.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` under `file_name`, replacing an existing file.
    async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<()>;

    /// Read a stored file, `None` when it does not exist.
    async fn get(&self, file_name: &str) -> Result<Option<Vec<u8>>>;
}
