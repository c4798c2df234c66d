//! Implementations of the admin ports.

pub mod http_content_api;
pub mod memory_store;
pub mod sled_store;

pub use http_content_api::HttpContentApi;
pub use memory_store::InMemoryKeyValueStore;
pub use sled_store::SledKeyValueStore;
