//! Working copy edited by the admin, with the form policies applied before
//! anything reaches the content manager.

use crate::application_service::content_manager::{ContentManager, SaveError, SaveOutcome};
use crate::application_service::images::{ImageError, ImageFile};
use crate::application_service::local_storage::Placement;
use chrono::{Datelike, Utc};
use protief_content::{
    ContentDocument, DocumentError, HeroSlideDraft, JobDraft, PartnerDraft, ProjectDraft,
    ProjectStatus, TimestampIdGenerator,
};
use std::sync::Arc;

pub const MAX_HERO_SLIDES: usize = 4;

const NEW_SLIDE_IMAGE: &str =
    "https://images.unsplash.com/photo-1544197150-b99a580bb7a8?w=1920&h=800&fit=crop&q=60";
const NEW_PROJECT_IMAGE: &str =
    "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400&h=300&fit=crop";
const NEW_PARTNER_LOGO: &str = "https://via.placeholder.com/200x100/1e40af/ffffff?text=Partner";

/// Entity an uploaded image is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    HeroSlide(String),
    About,
    Project(String),
    Partner(String),
}

impl ImageTarget {
    fn placement(&self) -> Placement {
        match self {
            ImageTarget::HeroSlide(_) => Placement::Hero,
            ImageTarget::About => Placement::About,
            ImageTarget::Project(_) => Placement::Project,
            ImageTarget::Partner(_) => Placement::Partner,
        }
    }

    fn item_id(&self) -> Option<&str> {
        match self {
            ImageTarget::HeroSlide(id) | ImageTarget::Project(id) | ImageTarget::Partner(id) => {
                Some(id.as_str())
            }
            ImageTarget::About => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Maximal 4 Slides erlaubt")]
    TooManySlides,
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

pub struct AdminEditor {
    manager: Arc<ContentManager>,
    ids: TimestampIdGenerator,
    content: ContentDocument,
}

impl AdminEditor {
    /// Starts editing whatever the manager loads.
    pub async fn open(manager: Arc<ContentManager>) -> Self {
        let content = manager.load_content().await;
        Self::with_content(manager, content)
    }

    pub fn with_content(manager: Arc<ContentManager>, content: ContentDocument) -> Self {
        Self {
            manager,
            ids: TimestampIdGenerator::new(),
            content,
        }
    }

    pub fn content(&self) -> &ContentDocument {
        &self.content
    }

    /// Direct access for field edits (titles, texts, links).
    pub fn content_mut(&mut self) -> &mut ContentDocument {
        &mut self.content
    }

    pub fn into_content(self) -> ContentDocument {
        self.content
    }

    pub fn can_add_hero_slide(&self) -> bool {
        self.content.hero_slides.len() < MAX_HERO_SLIDES
    }

    pub fn add_hero_slide(&mut self) -> Result<String, EditorError> {
        if !self.can_add_hero_slide() {
            return Err(EditorError::TooManySlides);
        }
        Ok(self.content.add_hero_slide(
            &self.ids,
            HeroSlideDraft {
                image: NEW_SLIDE_IMAGE.into(),
                title: "Neuer Slide".into(),
                subtitle: "Beschreibung".into(),
                button_text: "Mehr erfahren".into(),
                button_link: "/leistungen".into(),
            },
        ))
    }

    pub fn remove_hero_slide(&mut self, id: &str) -> Result<(), EditorError> {
        self.content.remove_hero_slide(id)?;
        Ok(())
    }

    pub fn add_project(&mut self) -> String {
        self.content.add_project(
            &self.ids,
            ProjectDraft {
                title: "Neues Projekt".into(),
                description: "Projektbeschreibung".into(),
                image: NEW_PROJECT_IMAGE.into(),
                category: "Allgemein".into(),
                year: Utc::now().year().to_string(),
                status: ProjectStatus::Planned,
            },
        )
    }

    pub fn remove_project(&mut self, id: &str) -> Result<(), EditorError> {
        self.content.remove_project(id)?;
        Ok(())
    }

    pub fn add_partner(&mut self) -> String {
        self.content.add_partner(
            &self.ids,
            PartnerDraft {
                name: "Neuer Partner".into(),
                logo: NEW_PARTNER_LOGO.into(),
            },
        )
    }

    pub fn remove_partner(&mut self, id: &str) -> Result<(), EditorError> {
        self.content.remove_partner(id)?;
        Ok(())
    }

    /// Creates a job (`id` is `None`) or replaces the fields of an existing
    /// one. Returns the job id. An invalid draft leaves the copy untouched.
    pub fn save_job(&mut self, id: Option<&str>, draft: JobDraft) -> Result<String, EditorError> {
        match id {
            Some(id) => {
                self.content.update_job(id, draft)?;
                Ok(id.to_string())
            }
            None => Ok(self.content.add_job(&self.ids, draft, Utc::now())?),
        }
    }

    pub fn delete_job(&mut self, id: &str) -> Result<(), EditorError> {
        self.content.remove_job(id)?;
        Ok(())
    }

    pub fn toggle_job_status(&mut self, id: &str) -> Result<bool, EditorError> {
        Ok(self.content.toggle_job_status(id)?)
    }

    /// Uploads `file` and points `target` at the returned reference.
    pub async fn upload_image(
        &mut self,
        target: ImageTarget,
        file: &ImageFile,
    ) -> Result<String, EditorError> {
        // Fail before uploading when the target is gone.
        match &target {
            ImageTarget::HeroSlide(id) => {
                self.content.hero_slide_mut(id)?;
            }
            ImageTarget::Project(id) => {
                self.content.project_mut(id)?;
            }
            ImageTarget::Partner(id) => {
                self.content.partner_mut(id)?;
            }
            ImageTarget::About => {}
        }

        let reference = self
            .manager
            .upload_image(file, target.placement(), target.item_id())
            .await?;

        match &target {
            ImageTarget::HeroSlide(id) => {
                self.content.set_hero_slide_image(id, reference.clone())?
            }
            ImageTarget::About => self.content.set_about_image(reference.clone()),
            ImageTarget::Project(id) => self.content.set_project_image(id, reference.clone())?,
            ImageTarget::Partner(id) => self.content.set_partner_logo(id, reference.clone())?,
        }
        Ok(reference)
    }

    /// Saves the working copy, then drops local images it no longer uses.
    pub async fn save(&self) -> Result<SaveOutcome, SaveError> {
        let outcome = self.manager.save_content(&self.content).await?;
        if let Err(e) = self.manager.cleanup_unused_images(&self.content) {
            tracing::warn!("Image cleanup after save failed: {e}");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::infrastructure::InMemoryKeyValueStore;
    use crate::port::{ApiError, ContentApi, ImageUpload, KeyValueStore};
    use async_trait::async_trait;
    use protief_content::{default_document, JobType, WireContent};
    use serde_json::Value;

    struct OfflineApi;

    #[async_trait]
    impl ContentApi for OfflineApi {
        async fn is_available(&self) -> bool {
            false
        }

        async fn fetch_content(&self) -> Result<Value, ApiError> {
            Err(ApiError::Transport("offline".into()))
        }

        async fn save_content(&self, _: &WireContent) -> Result<(), ApiError> {
            Err(ApiError::Transport("offline".into()))
        }

        async fn upload_image(&self, _: &ImageUpload) -> Result<String, ApiError> {
            Err(ApiError::Transport("offline".into()))
        }
    }

    fn editor() -> (AdminEditor, Arc<InMemoryKeyValueStore>) {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let manager = Arc::new(ContentManager::new(
            AdminConfig::default(),
            store.clone(),
            Arc::new(OfflineApi),
        ));
        (AdminEditor::with_content(manager, default_document()), store)
    }

    fn job_draft() -> JobDraft {
        JobDraft {
            title: "Tiefbauer (m/w/d)".into(),
            department: "Tiefbau".into(),
            location: "Düsseldorf".into(),
            job_type: JobType::Vollzeit,
            description: "Verlegung von Glasfaser".into(),
            requirements: vec!["Führerschein".into(), "  ".into()],
            benefits: vec!["Firmenwagen".into()],
            salary: None,
            is_active: true,
        }
    }

    #[test]
    fn test_fifth_slide_is_refused() {
        let (mut editor, _) = editor();
        assert_eq!(editor.content().hero_slides.len(), MAX_HERO_SLIDES);
        assert!(!editor.can_add_hero_slide());

        let err = editor.add_hero_slide().unwrap_err();
        assert_eq!(err.to_string(), "Maximal 4 Slides erlaubt");
        assert_eq!(editor.content().hero_slides.len(), MAX_HERO_SLIDES);
    }

    #[test]
    fn test_new_slide_defaults() {
        let (mut editor, _) = editor();
        let first = editor.content().hero_slides[0].id.clone();
        editor.remove_hero_slide(&first).unwrap();

        let id = editor.add_hero_slide().unwrap();
        let slide = editor.content().hero_slides.last().unwrap();
        assert_eq!(slide.id, id);
        assert_eq!(slide.title, "Neuer Slide");
        assert_eq!(slide.button_link, "/leistungen");
    }

    #[test]
    fn test_new_project_and_partner_defaults() {
        let (mut editor, _) = editor();
        let project = editor.add_project();
        let partner = editor.add_partner();

        let project = editor
            .content()
            .projects
            .iter()
            .find(|p| p.id == project)
            .unwrap();
        assert_eq!(project.status, ProjectStatus::Planned);
        assert_eq!(project.category, "Allgemein");
        assert_eq!(project.year, Utc::now().year().to_string());

        let partner = editor
            .content()
            .partners
            .iter()
            .find(|p| p.id == partner)
            .unwrap();
        assert_eq!(partner.name, "Neuer Partner");
    }

    #[test]
    fn test_save_job_create_and_edit() {
        let (mut editor, _) = editor();
        let id = editor.save_job(None, job_draft()).unwrap();
        let created_at = editor.content().job_by_id(&id).unwrap().created_at;
        assert_eq!(
            editor.content().job_by_id(&id).unwrap().requirements,
            vec!["Führerschein".to_string()]
        );

        let mut draft = job_draft();
        draft.title = "Polier (m/w/d)".into();
        assert_eq!(editor.save_job(Some(&id), draft).unwrap(), id);

        let job = editor.content().job_by_id(&id).unwrap();
        assert_eq!(job.title, "Polier (m/w/d)");
        assert_eq!(job.created_at, created_at);
    }

    #[test]
    fn test_invalid_job_is_rejected_without_changes() {
        let (mut editor, _) = editor();
        let before = editor.content().clone();

        let mut draft = job_draft();
        draft.benefits = vec![" ".into()];

        assert!(matches!(
            editor.save_job(None, draft),
            Err(EditorError::Document(DocumentError::Job(_)))
        ));
        assert_eq!(editor.content(), &before);
    }

    #[tokio::test]
    async fn test_upload_attaches_image_and_save_cleans_up() {
        let (mut editor, store) = editor();
        let slide = editor.content().hero_slides[0].id.clone();
        let file = ImageFile {
            name: "a.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };

        let replaced = editor
            .upload_image(ImageTarget::HeroSlide(slide.clone()), &file)
            .await
            .unwrap();
        let kept = editor.upload_image(ImageTarget::About, &file).await.unwrap();
        assert_eq!(editor.content().hero_slides[0].image, replaced);
        assert_eq!(editor.content().about_image, kept);

        editor.content_mut().hero_slides[0].image = "https://example.com/b.jpg".into();
        editor.save().await.unwrap();

        let replaced_key = protief_content::ImageRef::local_key(&replaced).unwrap();
        let kept_key = protief_content::ImageRef::local_key(&kept).unwrap();
        assert_eq!(store.get(replaced_key).unwrap(), None);
        assert!(store.get(kept_key).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upload_to_missing_target_fails_first() {
        let (mut editor, store) = editor();
        let file = ImageFile {
            name: "a.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![1],
        };
        let result = editor
            .upload_image(ImageTarget::Partner("nope".into()), &file)
            .await;
        assert!(matches!(result, Err(EditorError::Document(_))));
        assert!(store
            .keys_with_prefix(crate::application_service::local_storage::IMAGE_KEY_PREFIX)
            .unwrap()
            .is_empty());
    }
}
