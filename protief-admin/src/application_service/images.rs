use crate::application_service::local_storage::Placement;
use crate::port::StoreError;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use std::path::Path;

/// An image picked by the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    /// Client-side file name, e.g. `team.jpg`.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Reads a file from disk, deriving the MIME type from its extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            mime_type: mime_type_for(&name).to_string(),
            name,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }

    /// Rejects non-images and files above `max_bytes`.
    pub fn validate(&self, max_bytes: usize) -> Result<(), ImageError> {
        if !self.mime_type.to_ascii_lowercase().starts_with("image/") {
            return Err(ImageError::NotAnImage(self.mime_type.clone()));
        }
        if self.bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if self.bytes.len() > max_bytes {
            return Err(ImageError::TooLarge {
                size: self.bytes.len(),
                max: max_bytes,
            });
        }
        Ok(())
    }
}

fn mime_type_for(name: &str) -> &'static str {
    let ext = extension(name).unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// `<placement>-<itemId|main>-<millis>.<ext>`; the extension comes from the
/// original name and defaults to `jpg`.
pub fn derive_file_name(
    placement: Placement,
    item_id: Option<&str>,
    original_name: &str,
    now_millis: i64,
) -> String {
    let item = item_id.filter(|id| !id.is_empty()).unwrap_or("main");
    let ext = extension(original_name).unwrap_or("jpg");
    format!("{}-{item}-{now_millis}.{ext}", placement.as_str())
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("only image files are allowed (got `{0}`)")]
    NotAnImage(String),
    #[error("image is empty")]
    Empty,
    #[error("image is too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
    #[error("failed to store image locally: {0}")]
    Store(#[from] StoreError),
}
