//! Content synchronization between the API, local storage and the bundled
//! defaults.

use crate::application_service::export::{ExportEnvelope, ExportError, ImportError, EXPORT_VERSION};
use crate::application_service::images::{derive_file_name, ImageError, ImageFile};
use crate::application_service::local_storage::{
    image_key, read_document, read_ledger, write_document, write_ledger, Placement,
    UploadedFileRecord, CONTENT_KEY, IMAGE_KEY_PREFIX, UPLOADED_FILES_KEY,
};
use crate::application_service::providers::{
    ApiProvider, ContentProvider, DefaultsProvider, LocalStorageProvider,
};
use crate::config::AdminConfig;
use crate::events::{ContentSaved, ContentUpdated, SaveMethod};
use crate::port::{ContentApi, ImageUpload, KeyValueStore, StoreError};
use chrono::Utc;
use protief_content::{default_document, to_wire, ContentDocument, DocumentError, ImageRef};
use protief_event_manager::EventBus;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Error text recorded when a save skipped the API because the health check failed.
pub const SERVER_NOT_AVAILABLE: &str = "server not available";

/// Result of a save that reached at least local storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub method: SaveMethod,
    /// Why the API was not used, when it was not.
    pub api_error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Invalid(#[from] DocumentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed_keys: Vec<String>,
    pub pruned_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub images: usize,
    pub uploaded_files: usize,
}

pub struct ContentManager {
    config: AdminConfig,
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn ContentApi>,
    events: Arc<EventBus>,
    providers: Vec<Box<dyn ContentProvider>>,
}

impl ContentManager {
    pub fn new(
        config: AdminConfig,
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn ContentApi>,
    ) -> Self {
        let providers: Vec<Box<dyn ContentProvider>> = vec![
            Box::new(ApiProvider::new(api.clone(), store.clone())),
            Box::new(LocalStorageProvider::new(store.clone())),
            Box::new(DefaultsProvider),
        ];
        Self {
            config,
            store,
            api,
            events: Arc::new(EventBus::new()),
            providers,
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Bus carrying [`ContentSaved`] and [`ContentUpdated`].
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Loads from the first source that answers: API, local copy, defaults.
    pub async fn load_content(&self) -> ContentDocument {
        for provider in &self.providers {
            match provider.try_load().await {
                Ok(doc) => {
                    tracing::debug!(source = provider.name(), "Content loaded");
                    return doc;
                }
                Err(e) => {
                    tracing::warn!(source = provider.name(), "Falling back: {e}");
                }
            }
        }
        default_document()
    }

    /// Writes `doc` locally, then to the API when it is reachable.
    ///
    /// A document with an invalid job is refused before anything is written.
    /// Otherwise only a local write failure is an error; an API failure
    /// downgrades the outcome to [`SaveMethod::LocalStorage`].
    pub async fn save_content(&self, doc: &ContentDocument) -> Result<SaveOutcome, SaveError> {
        if let Err(e) = doc.validate_jobs() {
            tracing::error!("Refusing to save content: {e}");
            self.publish_save_failure(&e);
            return Err(e.into());
        }
        if let Err(e) = write_document(self.store.as_ref(), doc) {
            tracing::error!("Error saving content locally: {e}");
            self.publish_save_failure(&e);
            return Err(e.into());
        }

        let outcome = if self.api.is_available().await {
            match self.api.save_content(&to_wire(doc)).await {
                Ok(()) => {
                    tracing::info!("Content saved to API");
                    SaveOutcome {
                        method: SaveMethod::Api,
                        api_error: None,
                    }
                }
                Err(e) => {
                    tracing::warn!("API save failed, kept local copy: {e}");
                    SaveOutcome {
                        method: SaveMethod::LocalStorage,
                        api_error: Some(e.to_string()),
                    }
                }
            }
        } else {
            tracing::warn!("API not available, content saved locally only");
            SaveOutcome {
                method: SaveMethod::LocalStorage,
                api_error: Some(SERVER_NOT_AVAILABLE.to_string()),
            }
        };

        self.events.publish(&ContentSaved {
            success: true,
            method: outcome.method,
            error: outcome.api_error.clone(),
        });
        self.events.publish(&ContentUpdated);
        Ok(outcome)
    }

    fn publish_save_failure(&self, error: &dyn Display) {
        self.events.publish(&ContentSaved {
            success: false,
            method: SaveMethod::LocalStorage,
            error: Some(error.to_string()),
        });
    }

    /// Stores an image and returns the reference to put into the document:
    /// the server path when the upload endpoint accepts it, a `local://`
    /// token otherwise.
    pub async fn upload_image(
        &self,
        file: &ImageFile,
        placement: Placement,
        item_id: Option<&str>,
    ) -> Result<String, ImageError> {
        file.validate(self.config.max_upload_bytes)?;
        let now = Utc::now();
        let file_name = derive_file_name(placement, item_id, &file.name, now.timestamp_millis());

        if self.api.is_available().await {
            let upload = ImageUpload {
                file_name: file_name.clone(),
                original_name: file.name.clone(),
                mime_type: file.mime_type.clone(),
                bytes: file.bytes.clone(),
            };
            match self.api.upload_image(&upload).await {
                Ok(path) => {
                    tracing::info!(%path, "Image uploaded to API");
                    return Ok(path);
                }
                Err(e) => tracing::warn!("Image upload failed, storing locally: {e}"),
            }
        }

        let key = image_key(&file_name);
        self.store.set(&key, &file.to_data_url())?;

        let mut ledger = read_ledger(self.store.as_ref())?;
        ledger.push(UploadedFileRecord {
            file_name,
            image_key: key.clone(),
            placement,
            item_id: item_id.map(str::to_string),
            upload_date: now,
            original_name: file.name.clone(),
            size: file.size(),
        });
        write_ledger(self.store.as_ref(), &ledger)?;

        tracing::info!(%key, "Image stored locally");
        Ok(ImageRef::local_token(&key))
    }

    /// Displayable URL for an image reference.
    pub fn get_image_url(&self, reference: &str) -> String {
        match ImageRef::parse(reference) {
            ImageRef::Local(key) => match self.store.get(key) {
                Ok(Some(payload)) => payload,
                Ok(None) => self.config.placeholder_image.clone(),
                Err(e) => {
                    tracing::warn!("Failed to read local image {key}: {e}");
                    self.config.placeholder_image.clone()
                }
            },
            ImageRef::Upload(path) => match self.upload_origin() {
                Some(origin) => format!("{origin}{path}"),
                None => path.to_string(),
            },
            ImageRef::External(url) => url.to_string(),
            ImageRef::Empty => String::new(),
        }
    }

    /// API origin, when uploads are served from a different origin than the
    /// site.
    fn upload_origin(&self) -> Option<String> {
        let api = Url::parse(&self.config.api_url).ok()?.origin();
        let site = Url::parse(self.config.site_origin.as_deref()?).ok()?.origin();
        (api != site).then(|| api.ascii_serialization())
    }

    /// Removes locally stored images `doc` no longer references and prunes
    /// the upload ledger to match.
    pub fn cleanup_unused_images(&self, doc: &ContentDocument) -> Result<CleanupReport, StoreError> {
        let reachable = doc.local_image_keys();
        let mut report = CleanupReport::default();

        for key in self.store.keys_with_prefix(IMAGE_KEY_PREFIX)? {
            if !reachable.contains(&key) {
                self.store.remove(&key)?;
                report.removed_keys.push(key);
            }
        }

        let ledger = read_ledger(self.store.as_ref())?;
        let before = ledger.len();
        let kept: Vec<_> = ledger
            .into_iter()
            .filter(|record| reachable.contains(&record.image_key))
            .collect();
        report.pruned_records = before - kept.len();
        if report.pruned_records > 0 {
            write_ledger(self.store.as_ref(), &kept)?;
        }

        if !report.removed_keys.is_empty() {
            tracing::info!(removed = report.removed_keys.len(), "Unused images removed");
        }
        Ok(report)
    }

    /// Local content, every stored image and the upload ledger as pretty JSON.
    pub fn export_all_data(&self) -> Result<String, ExportError> {
        let store = self.store.as_ref();
        let content = read_document(store)?.unwrap_or_else(default_document);

        let mut images = BTreeMap::new();
        for key in store.keys_with_prefix(IMAGE_KEY_PREFIX)? {
            if let Some(payload) = store.get(&key)? {
                images.insert(key, payload);
            }
        }

        let envelope = ExportEnvelope {
            version: EXPORT_VERSION.to_string(),
            exported_at: Utc::now(),
            content,
            images,
            uploaded_files: read_ledger(store)?,
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    pub async fn export_to_file(&self, path: &Path) -> Result<(), ExportError> {
        let json = self.export_all_data()?;
        tokio::fs::write(path, json).await?;
        tracing::info!("Exported content to {}", path.display());
        Ok(())
    }

    /// Replaces local storage with an export. The export is checked fully
    /// before anything is written. New data is written over the old; if a
    /// write fails the previous content, ledger and images are put back.
    /// Images only the previous data used are removed last.
    pub fn import_all_data(&self, json: &str) -> Result<ImportSummary, ImportError> {
        let envelope = ExportEnvelope::parse(json)?;
        let store = self.store.as_ref();
        let previous = StoreSnapshot::capture(store)?;

        if let Err(e) = apply_import(store, &envelope) {
            tracing::error!("Import failed, restoring previous data: {e}");
            if let Err(restore) = previous.restore(store, &envelope) {
                tracing::error!("Failed to restore previous data: {restore}");
            }
            return Err(e.into());
        }

        for key in previous.images.keys() {
            if envelope.images.contains_key(key) {
                continue;
            }
            if let Err(e) = store.remove(key) {
                tracing::warn!("Failed to remove stale image {key}: {e}");
            }
        }

        self.events.publish(&ContentUpdated);
        tracing::info!(images = envelope.images.len(), "Import applied");
        Ok(ImportSummary {
            images: envelope.images.len(),
            uploaded_files: envelope.uploaded_files.len(),
        })
    }
}

fn apply_import(store: &dyn KeyValueStore, envelope: &ExportEnvelope) -> Result<(), StoreError> {
    for (key, payload) in &envelope.images {
        store.set(key, payload)?;
    }
    write_ledger(store, &envelope.uploaded_files)?;
    write_document(store, &envelope.content)
}

/// Raw values of everything an import overwrites.
struct StoreSnapshot {
    content: Option<String>,
    ledger: Option<String>,
    images: BTreeMap<String, String>,
}

impl StoreSnapshot {
    fn capture(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        let mut images = BTreeMap::new();
        for key in store.keys_with_prefix(IMAGE_KEY_PREFIX)? {
            if let Some(payload) = store.get(&key)? {
                images.insert(key, payload);
            }
        }
        Ok(Self {
            content: store.get(CONTENT_KEY)?,
            ledger: store.get(UPLOADED_FILES_KEY)?,
            images,
        })
    }

    /// Undoes a partly applied `envelope`.
    fn restore(&self, store: &dyn KeyValueStore, envelope: &ExportEnvelope) -> Result<(), StoreError> {
        for key in envelope.images.keys() {
            if !self.images.contains_key(key) {
                store.remove(key)?;
            }
        }
        for (key, payload) in &self.images {
            store.set(key, payload)?;
        }
        restore_value(store, UPLOADED_FILES_KEY, self.ledger.as_deref())?;
        restore_value(store, CONTENT_KEY, self.content.as_deref())
    }
}

fn restore_value(store: &dyn KeyValueStore, key: &str, value: Option<&str>) -> Result<(), StoreError> {
    match value {
        Some(value) => store.set(key, value),
        None => store.remove(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryKeyValueStore;
    use crate::port::ApiError;
    use async_trait::async_trait;
    use protief_content::{HeroSlideDraft, TimestampIdGenerator, WireContent};
    use serde_json::Value;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        available: bool,
        fail_requests: bool,
        stored: Mutex<Option<Value>>,
        uploads: Mutex<Vec<ImageUpload>>,
    }

    impl FakeApi {
        fn up() -> Self {
            Self {
                available: true,
                ..Self::default()
            }
        }

        fn down() -> Self {
            Self::default()
        }

        fn failing() -> Self {
            Self {
                available: true,
                fail_requests: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ContentApi for FakeApi {
        async fn is_available(&self) -> bool {
            self.available
        }

        async fn fetch_content(&self) -> Result<Value, ApiError> {
            if self.fail_requests {
                return Err(ApiError::Timeout);
            }
            self.stored
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| ApiError::Status {
                    status: 500,
                    message: "Failed to load content".into(),
                })
        }

        async fn save_content(&self, content: &WireContent) -> Result<(), ApiError> {
            if self.fail_requests {
                return Err(ApiError::Transport("connection reset".into()));
            }
            *self.stored.lock().unwrap() = Some(content.to_value().unwrap());
            Ok(())
        }

        async fn upload_image(&self, upload: &ImageUpload) -> Result<String, ApiError> {
            if self.fail_requests {
                return Err(ApiError::Timeout);
            }
            self.uploads.lock().unwrap().push(upload.clone());
            Ok(format!("/uploads/{}", upload.file_name))
        }
    }

    fn manager(api: FakeApi) -> (ContentManager, Arc<InMemoryKeyValueStore>) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let manager = ContentManager::new(AdminConfig::default(), store.clone(), Arc::new(api));
        (manager, store)
    }

    fn png(name: &str) -> ImageFile {
        ImageFile {
            name: name.into(),
            mime_type: "image/png".into(),
            bytes: b"png-bytes".to_vec(),
        }
    }

    fn record_events(manager: &ContentManager) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let log = log.clone();
            manager.events().subscribe(move |e: &ContentSaved| {
                log.lock().unwrap().push(format!("saved:{}:{}", e.success, e.method));
            });
        }
        {
            let log = log.clone();
            manager
                .events()
                .subscribe(move |_: &ContentUpdated| log.lock().unwrap().push("updated".into()));
        }
        log
    }

    #[tokio::test]
    async fn test_load_falls_back_to_defaults() {
        let (manager, _) = manager(FakeApi::down());
        assert_eq!(manager.load_content().await, default_document());
    }

    #[tokio::test]
    async fn test_load_prefers_local_copy_over_defaults() {
        let (manager, store) = manager(FakeApi::failing());
        let mut doc = default_document();
        doc.about_image = "/uploads/team.jpg".into();
        write_document(store.as_ref(), &doc).unwrap();

        assert_eq!(manager.load_content().await, doc);
    }

    #[tokio::test]
    async fn test_load_from_api_keeps_local_jobs_and_mirrors() {
        let api = FakeApi::up();
        let mut remote = default_document();
        remote.about_image = "/uploads/remote.jpg".into();
        *api.stored.lock().unwrap() = Some(to_wire(&remote).to_value().unwrap());
        let (manager, store) = manager(api);

        let mut local = default_document();
        local.jobs.truncate(1);
        write_document(store.as_ref(), &local).unwrap();

        let loaded = manager.load_content().await;
        assert_eq!(loaded.about_image, "/uploads/remote.jpg");
        assert_eq!(loaded.jobs, local.jobs);
        assert_eq!(read_document(store.as_ref()).unwrap(), Some(loaded));
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_api_document() {
        let api = FakeApi::up();
        *api.stored.lock().unwrap() = Some(serde_json::json!({ "hero": {} }));
        let (manager, _) = manager(api);
        assert_eq!(manager.load_content().await, default_document());
    }

    #[tokio::test]
    async fn test_save_via_api() {
        let (manager, store) = manager(FakeApi::up());
        let log = record_events(&manager);

        let outcome = manager.save_content(&default_document()).await.unwrap();

        assert_eq!(outcome.method, SaveMethod::Api);
        assert_eq!(outcome.api_error, None);
        assert!(read_document(store.as_ref()).unwrap().is_some());
        assert_eq!(*log.lock().unwrap(), vec!["saved:true:api", "updated"]);
    }

    #[tokio::test]
    async fn test_save_survives_api_failure() {
        let (manager, store) = manager(FakeApi::failing());
        let log = record_events(&manager);
        let doc = default_document();

        let outcome = manager.save_content(&doc).await.unwrap();

        assert_eq!(outcome.method, SaveMethod::LocalStorage);
        assert!(outcome.api_error.unwrap().contains("connection reset"));
        assert_eq!(read_document(store.as_ref()).unwrap(), Some(doc));
        assert_eq!(*log.lock().unwrap(), vec!["saved:true:localStorage", "updated"]);
    }

    #[tokio::test]
    async fn test_save_when_api_down() {
        let (manager, _) = manager(FakeApi::down());
        let outcome = manager.save_content(&default_document()).await.unwrap();
        assert_eq!(outcome.api_error.as_deref(), Some(SERVER_NOT_AVAILABLE));
    }

    #[tokio::test]
    async fn test_save_local_failure_is_reported() {
        let store = Arc::new(InMemoryKeyValueStore::with_quota(16));
        let manager = ContentManager::new(AdminConfig::default(), store, Arc::new(FakeApi::up()));
        let log = record_events(&manager);

        let result = manager.save_content(&default_document()).await;

        assert!(matches!(
            result,
            Err(SaveError::Store(StoreError::QuotaExceeded { .. }))
        ));
        assert_eq!(*log.lock().unwrap(), vec!["saved:false:localStorage"]);
    }

    #[tokio::test]
    async fn test_save_refuses_invalid_job_before_writing() {
        let api = Arc::new(FakeApi::up());
        let store = Arc::new(InMemoryKeyValueStore::new());
        let manager = ContentManager::new(AdminConfig::default(), store.clone(), api.clone());
        let log = record_events(&manager);

        let mut doc = default_document();
        doc.jobs[0].requirements.clear();
        doc.jobs[0].benefits = vec!["  ".into()];
        let result = manager.save_content(&doc).await;

        assert!(matches!(
            result,
            Err(SaveError::Invalid(DocumentError::InvalidJob { .. }))
        ));
        assert_eq!(store.get(CONTENT_KEY).unwrap(), None);
        assert!(api.stored.lock().unwrap().is_none());
        assert_eq!(*log.lock().unwrap(), vec!["saved:false:localStorage"]);
    }

    #[tokio::test]
    async fn test_fifth_slide_survives_save_and_load() {
        let (manager, _) = manager(FakeApi::down());
        let mut doc = default_document();
        doc.add_hero_slide(
            &TimestampIdGenerator::new(),
            HeroSlideDraft {
                image: "https://example.com/5.jpg".into(),
                title: "Fünf".into(),
                subtitle: "".into(),
                button_text: "Mehr erfahren".into(),
                button_link: "/leistungen".into(),
            },
        );
        manager.save_content(&doc).await.unwrap();

        assert_eq!(manager.load_content().await.hero_slides.len(), 5);
    }

    #[tokio::test]
    async fn test_upload_uses_api_when_available() {
        let (manager, store) = manager(FakeApi::up());
        let path = manager
            .upload_image(&png("a.png"), Placement::Hero, Some("1"))
            .await
            .unwrap();
        assert!(path.starts_with("/uploads/hero-1-"));
        assert!(store.keys_with_prefix(IMAGE_KEY_PREFIX).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_falls_back_to_local_token() {
        let (manager, store) = manager(FakeApi::failing());
        let token = manager
            .upload_image(&png("a.png"), Placement::Partner, None)
            .await
            .unwrap();

        let key = ImageRef::local_key(&token).unwrap();
        assert!(key.starts_with("protief-image-partner-main-"));
        assert_eq!(
            manager.get_image_url(&token),
            "data:image/png;base64,cG5nLWJ5dGVz"
        );
        let ledger = read_ledger(store.as_ref()).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].image_key, key);
        assert_eq!(ledger[0].size, 9);
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_files() {
        let (manager, _) = manager(FakeApi::up());
        let text = ImageFile {
            mime_type: "text/plain".into(),
            ..png("a.txt")
        };
        assert!(matches!(
            manager.upload_image(&text, Placement::About, None).await,
            Err(ImageError::NotAnImage(_))
        ));

        let big = ImageFile {
            bytes: vec![0; 5 * 1024 * 1024 + 1],
            ..png("big.png")
        };
        assert!(matches!(
            manager.upload_image(&big, Placement::About, None).await,
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_image_url_for_missing_local_payload_is_placeholder() {
        let (manager, _) = manager(FakeApi::down());
        assert_eq!(
            manager.get_image_url("local://missing-key"),
            AdminConfig::default().placeholder_image
        );
        assert_eq!(
            manager.get_image_url("https://images.unsplash.com/x"),
            "https://images.unsplash.com/x"
        );
        assert_eq!(manager.get_image_url("/uploads/a.jpg"), "/uploads/a.jpg");
    }

    #[test]
    fn test_upload_paths_rewritten_across_origins() {
        let config = AdminConfig {
            api_url: "http://localhost:3001/api".into(),
            site_origin: Some("http://localhost:5173".into()),
            ..AdminConfig::default()
        };
        let manager = ContentManager::new(
            config,
            Arc::new(InMemoryKeyValueStore::new()),
            Arc::new(FakeApi::down()),
        );
        assert_eq!(
            manager.get_image_url("/uploads/a.jpg"),
            "http://localhost:3001/uploads/a.jpg"
        );
    }

    #[tokio::test]
    async fn test_cleanup_removes_unreachable_images() {
        let (manager, store) = manager(FakeApi::down());
        let used = manager
            .upload_image(&png("used.png"), Placement::About, None)
            .await
            .unwrap();
        let unused = manager
            .upload_image(&png("unused.png"), Placement::Hero, Some("9"))
            .await
            .unwrap();

        let mut doc = default_document();
        doc.set_about_image(used.clone());

        let report = manager.cleanup_unused_images(&doc).unwrap();
        assert_eq!(
            report.removed_keys,
            vec![ImageRef::local_key(&unused).unwrap().to_string()]
        );
        assert_eq!(report.pruned_records, 1);
        assert_eq!(
            store.keys_with_prefix(IMAGE_KEY_PREFIX).unwrap(),
            vec![ImageRef::local_key(&used).unwrap().to_string()]
        );

        assert_eq!(
            manager.cleanup_unused_images(&doc).unwrap(),
            CleanupReport::default()
        );
    }

    #[tokio::test]
    async fn test_export_import_roundtrip() {
        let (source, _) = manager(FakeApi::down());
        let token = source
            .upload_image(&png("logo.png"), Placement::Partner, Some("1"))
            .await
            .unwrap();
        let mut doc = default_document();
        doc.set_partner_logo("1", token.clone()).unwrap();
        source.save_content(&doc).await.unwrap();

        let exported = source.export_all_data().unwrap();

        let (target, target_store) = manager(FakeApi::down());
        target_store.set("protief-image-stale.png", "old").unwrap();
        let log = record_events(&target);

        let summary = target.import_all_data(&exported).unwrap();

        assert_eq!(summary.images, 1);
        assert_eq!(summary.uploaded_files, 1);
        assert_eq!(read_document(target_store.as_ref()).unwrap(), Some(doc));
        assert_eq!(target_store.get("protief-image-stale.png").unwrap(), None);
        assert_eq!(target.get_image_url(&token), source.get_image_url(&token));
        assert_eq!(*log.lock().unwrap(), vec!["updated"]);
    }

    #[tokio::test]
    async fn test_import_rejects_incomplete_envelope_without_changes() {
        let (manager, store) = manager(FakeApi::down());
        manager.save_content(&default_document()).await.unwrap();
        store.set("protief-image-keep.png", "data").unwrap();
        let before = store.get(CONTENT_KEY).unwrap();

        let err = manager
            .import_all_data(r#"{ "version": "1.0", "content": {} }"#)
            .unwrap_err();

        assert!(matches!(err, ImportError::MissingImages));
        assert_eq!(store.get("protief-image-keep.png").unwrap().as_deref(), Some("data"));
        assert_eq!(store.get(CONTENT_KEY).unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_import_restores_previous_data() {
        let store = Arc::new(InMemoryKeyValueStore::with_quota(60_000));
        let manager = ContentManager::new(
            AdminConfig::default(),
            store.clone(),
            Arc::new(FakeApi::down()),
        );
        let token = manager
            .upload_image(&png("team.png"), Placement::About, None)
            .await
            .unwrap();
        let mut doc = default_document();
        doc.set_about_image(token.clone());
        manager.save_content(&doc).await.unwrap();
        let ledger = store.get(UPLOADED_FILES_KEY).unwrap();
        let log = record_events(&manager);

        let envelope = serde_json::json!({
            "version": EXPORT_VERSION,
            "content": default_document(),
            "images": {
                "protief-image-a-new.png": "data:image/png;base64,AAAA",
                "protief-image-z-big.png": "x".repeat(100_000),
            },
            "uploadedFiles": [],
        });
        let err = manager.import_all_data(&envelope.to_string()).unwrap_err();

        assert!(matches!(
            err,
            ImportError::Store(StoreError::QuotaExceeded { .. })
        ));
        assert_eq!(read_document(store.as_ref()).unwrap(), Some(doc));
        assert_eq!(store.get(UPLOADED_FILES_KEY).unwrap(), ledger);
        assert_eq!(store.get("protief-image-a-new.png").unwrap(), None);
        assert_eq!(
            manager.get_image_url(&token),
            "data:image/png;base64,cG5nLWJ5dGVz"
        );
        assert!(log.lock().unwrap().is_empty());
    }
}
