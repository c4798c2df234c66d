//! Admin side of the ProTief site: loads and saves the content document
//! through the API with local fallbacks, handles image uploads and backups.

pub mod application_service;
pub mod config;
pub mod events;
pub mod infrastructure;
pub mod port;

pub use application_service::{AdminEditor, ContentManager, SaveOutcome};
pub use config::{AdminConfig, ConfigError};
pub use events::{ContentSaved, ContentUpdated, SaveMethod};
