//! Port layer - interfaces the content manager depends on

pub mod content_api;
pub mod key_value_store;

pub use content_api::{ApiError, ContentApi, ImageUpload};
pub use key_value_store::{KeyValueStore, StoreError};
