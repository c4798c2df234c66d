use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Storage of the single site content document.
///
/// Writes replace the whole document; the last writer wins.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read the stored document.
    async fn load(&self) -> Result<Value>;

    /// Replace the stored document. Readers never observe a partial write.
    async fn save(&self, document: &Value) -> Result<()>;
}
