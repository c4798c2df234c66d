pub mod defaults;
pub mod document;
pub mod id;
pub mod image_ref;
pub mod job;

pub use defaults::default_document;
pub use document::{
    ContentDocument, DocumentError, HeroSlide, HeroSlideDraft, Partner, PartnerDraft, Project,
    ProjectDraft, ProjectStatus,
};
pub use id::{IdGenerator, TimestampIdGenerator};
pub use image_ref::{ImageRef, LOCAL_SCHEME, UPLOADS_PREFIX};
pub use job::{Job, JobDraft, JobError, JobType};
