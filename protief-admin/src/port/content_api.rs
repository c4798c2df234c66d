use async_trait::async_trait;
use protief_content::WireContent;
use serde_json::Value;

/// An image file handed to the upload endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// Name the server should store the file under.
    pub file_name: String,
    /// Name of the file on the client.
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Remote content API.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Bounded availability check. Never fails; an unreachable API is `false`.
    async fn is_available(&self) -> bool;

    /// The stored content document, unvalidated.
    async fn fetch_content(&self) -> Result<Value, ApiError>;

    async fn save_content(&self, content: &WireContent) -> Result<(), ApiError>;

    /// Uploads an image and returns its public path.
    async fn upload_image(&self, upload: &ImageUpload) -> Result<String, ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
