/// String key-value storage standing in for the browser's local storage.
///
/// Implementations are synchronous and shared behind `Arc`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Every key starting with `prefix`, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),
    #[error("stored value for `{key}` is not valid UTF-8")]
    Encoding { key: String },
    #[error("failed to encode value: {0}")]
    Serialization(#[from] serde_json::Error),
}
