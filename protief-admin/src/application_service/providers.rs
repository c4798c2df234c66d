//! Sources the content manager loads from, tried in order.

use crate::application_service::local_storage::{read_document, write_document};
use crate::port::{ApiError, ContentApi, KeyValueStore, StoreError};
use async_trait::async_trait;
use protief_content::{default_document, from_wire, ContentDocument, WireContent, WireError};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("API not available")]
    Unavailable,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no local copy")]
    Missing,
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_load(&self) -> Result<ContentDocument, LoadError>;
}

/// Content from the API, mirrored into local storage.
pub struct ApiProvider {
    api: Arc<dyn ContentApi>,
    store: Arc<dyn KeyValueStore>,
}

impl ApiProvider {
    pub fn new(api: Arc<dyn ContentApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { api, store }
    }
}

#[async_trait]
impl ContentProvider for ApiProvider {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn try_load(&self) -> Result<ContentDocument, LoadError> {
        if !self.api.is_available().await {
            return Err(LoadError::Unavailable);
        }
        let wire = WireContent::from_value(self.api.fetch_content().await?)?;

        // Jobs only live client side.
        let jobs = match read_document(self.store.as_ref()) {
            Ok(Some(local)) => local.jobs,
            _ => default_document().jobs,
        };
        let doc = from_wire(wire, jobs);

        if let Err(e) = write_document(self.store.as_ref(), &doc) {
            tracing::warn!("Failed to mirror API content into local storage: {e}");
        }
        Ok(doc)
    }
}

/// The last locally saved document.
pub struct LocalStorageProvider {
    store: Arc<dyn KeyValueStore>,
}

impl LocalStorageProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContentProvider for LocalStorageProvider {
    fn name(&self) -> &'static str {
        "localStorage"
    }

    async fn try_load(&self) -> Result<ContentDocument, LoadError> {
        read_document(self.store.as_ref())?.ok_or(LoadError::Missing)
    }
}

/// The bundled default document. Never fails.
pub struct DefaultsProvider;

#[async_trait]
impl ContentProvider for DefaultsProvider {
    fn name(&self) -> &'static str {
        "defaults"
    }

    async fn try_load(&self) -> Result<ContentDocument, LoadError> {
        Ok(default_document())
    }
}
