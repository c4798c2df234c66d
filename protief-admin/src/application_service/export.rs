//! Whole-store backup format.

use crate::application_service::local_storage::{UploadedFileRecord, IMAGE_KEY_PREFIX};
use crate::port::StoreError;
use chrono::{DateTime, Utc};
use protief_content::{ContentDocument, DocumentError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub content: ContentDocument,
    /// Image store key to data-URL payload.
    pub images: BTreeMap<String, String>,
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFileRecord>,
}

/// `protief-backup-<date>.json`
pub fn default_export_file_name(now: DateTime<Utc>) -> String {
    format!("protief-backup-{}.json", now.format("%Y-%m-%d"))
}

impl ExportEnvelope {
    /// Parses and checks an export. Nothing is applied here.
    pub fn parse(json: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(json).map_err(ImportError::Json)?;

        let content = match value.get("content") {
            Some(content) if content.is_object() => content.clone(),
            _ => return Err(ImportError::MissingContent),
        };
        let images = match value.get("images") {
            Some(images) if images.is_object() => images.clone(),
            _ => return Err(ImportError::MissingImages),
        };

        let content: ContentDocument = serde_json::from_value(content)
            .map_err(|e| ImportError::InvalidContent(e.to_string()))?;
        content.validate_jobs().map_err(ImportError::InvalidJob)?;
        let images: BTreeMap<String, String> = serde_json::from_value(images)
            .map_err(|e| ImportError::InvalidImages(e.to_string()))?;
        if let Some(key) = images.keys().find(|k| !k.starts_with(IMAGE_KEY_PREFIX)) {
            return Err(ImportError::InvalidImages(format!(
                "key `{key}` is not an image key"
            )));
        }
        let uploaded_files = match value.get("uploadedFiles") {
            None | Some(Value::Null) => Vec::new(),
            Some(files) => serde_json::from_value(files.clone())
                .map_err(|e| ImportError::InvalidUploadedFiles(e.to_string()))?,
        };

        Ok(Self {
            version: value
                .get("version")
                .and_then(Value::as_str)
                .unwrap_or(EXPORT_VERSION)
                .to_string(),
            exported_at: value
                .get("exportedAt")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_else(Utc::now),
            content,
            images,
            uploaded_files,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("import file is not valid JSON: {0}")]
    Json(serde_json::Error),
    #[error("import file has no `content` section")]
    MissingContent,
    #[error("import file has no `images` section")]
    MissingImages,
    #[error("invalid `content` section: {0}")]
    InvalidContent(String),
    #[error("invalid `content` section: {0}")]
    InvalidJob(#[source] DocumentError),
    #[error("invalid `images` section: {0}")]
    InvalidImages(String),
    #[error("invalid `uploadedFiles` section: {0}")]
    InvalidUploadedFiles(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use protief_content::default_document;
    use serde_json::json;

    #[test]
    fn test_parse_requires_content_and_images() {
        let content = serde_json::to_value(default_document()).unwrap();

        let no_content = json!({ "version": "1.0", "images": {} }).to_string();
        assert!(matches!(
            ExportEnvelope::parse(&no_content),
            Err(ImportError::MissingContent)
        ));

        let no_images = json!({ "content": content }).to_string();
        assert!(matches!(
            ExportEnvelope::parse(&no_images),
            Err(ImportError::MissingImages)
        ));

        assert!(matches!(
            ExportEnvelope::parse("not json"),
            Err(ImportError::Json(_))
        ));
    }

    #[test]
    fn test_parse_rejects_foreign_image_keys() {
        let content = serde_json::to_value(default_document()).unwrap();
        let raw = json!({ "content": content, "images": { "protief-content": "x" } }).to_string();
        assert!(matches!(
            ExportEnvelope::parse(&raw),
            Err(ImportError::InvalidImages(_))
        ));
    }

    #[test]
    fn test_parse_rejects_invalid_job() {
        let mut doc = default_document();
        doc.jobs[0].requirements = vec!["".into()];
        let raw = json!({ "content": doc, "images": {} }).to_string();
        assert!(matches!(
            ExportEnvelope::parse(&raw),
            Err(ImportError::InvalidJob(DocumentError::InvalidJob { .. }))
        ));
    }

    #[test]
    fn test_parse_minimal_envelope() {
        let content = serde_json::to_value(default_document()).unwrap();
        let raw = json!({
            "content": content,
            "images": { "protief-image-a.png": "data:image/png;base64,AA==" }
        })
        .to_string();

        let envelope = ExportEnvelope::parse(&raw).unwrap();
        assert_eq!(envelope.version, EXPORT_VERSION);
        assert_eq!(envelope.content, default_document());
        assert_eq!(envelope.images.len(), 1);
        assert!(envelope.uploaded_files.is_empty());
    }

    #[test]
    fn test_default_export_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(default_export_file_name(now), "protief-backup-2024-03-09.json");
    }
}
