//! Filesystem implementations of the storage ports.

pub mod file_names;
pub mod json_file_store;
pub mod upload_directory;

pub use json_file_store::JsonFileContentStore;
pub use upload_directory::UploadDirectory;
