//! Port layer - storage interfaces used by the HTTP handlers

pub mod content_store;
pub mod image_store;

pub use content_store::ContentStore;
pub use image_store::ImageStore;
