//! Application services of the admin: content synchronization, image
//! handling, backups and the editing working copy.

pub mod content_manager;
pub mod editor;
pub mod export;
pub mod images;
pub mod local_storage;
pub mod providers;

pub use content_manager::{CleanupReport, ContentManager, ImportSummary, SaveError, SaveOutcome};
pub use editor::{AdminEditor, EditorError, ImageTarget, MAX_HERO_SLIDES};
pub use export::{default_export_file_name, ExportEnvelope, ExportError, ImportError};
pub use images::{ImageError, ImageFile};
pub use local_storage::{Placement, UploadedFileRecord};
pub use providers::{ContentProvider, LoadError};
