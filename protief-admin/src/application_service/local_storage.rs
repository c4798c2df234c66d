//! Layout of the local key-value store.

use crate::port::{KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use protief_content::ContentDocument;
use serde::{Deserialize, Serialize};

/// Serialized [`ContentDocument`] in the admin shape.
pub const CONTENT_KEY: &str = "protief-content";
/// Prefix of every locally stored image payload.
pub const IMAGE_KEY_PREFIX: &str = "protief-image-";
/// JSON array of [`UploadedFileRecord`].
pub const UPLOADED_FILES_KEY: &str = "protief-uploaded-files";

pub fn image_key(file_name: &str) -> String {
    format!("{IMAGE_KEY_PREFIX}{file_name}")
}

/// Site section an image is uploaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Hero,
    About,
    Project,
    Partner,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Hero => "hero",
            Placement::About => "about",
            Placement::Project => "project",
            Placement::Partner => "partner",
        }
    }
}

impl std::str::FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(Placement::Hero),
            "about" => Ok(Placement::About),
            "project" => Ok(Placement::Project),
            "partner" => Ok(Placement::Partner),
            other => Err(format!(
                "unknown placement `{other}` (expected hero, about, project or partner)"
            )),
        }
    }
}

/// Ledger entry for an image kept in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileRecord {
    pub file_name: String,
    pub image_key: String,
    #[serde(rename = "type")]
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub original_name: String,
    pub size: u64,
}

pub fn read_document(store: &dyn KeyValueStore) -> Result<Option<ContentDocument>, StoreError> {
    match store.get(CONTENT_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn write_document(store: &dyn KeyValueStore, doc: &ContentDocument) -> Result<(), StoreError> {
    let raw = serde_json::to_string(doc)?;
    store.set(CONTENT_KEY, &raw)
}

/// The upload ledger. A missing or unreadable ledger is empty.
pub fn read_ledger(store: &dyn KeyValueStore) -> Result<Vec<UploadedFileRecord>, StoreError> {
    let Some(raw) = store.get(UPLOADED_FILES_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!("Ignoring unreadable upload ledger: {e}");
            Ok(Vec::new())
        }
    }
}

pub fn write_ledger(
    store: &dyn KeyValueStore,
    records: &[UploadedFileRecord],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(records)?;
    store.set(UPLOADED_FILES_KEY, &raw)
}
