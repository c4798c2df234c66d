use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{fresh_id, IdGenerator};
use super::image_ref::ImageRef;
use super::job::{Job, JobDraft, JobError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: String,
    pub image: String,
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroSlideDraft {
    pub image: String,
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Geplant")]
    Planned,
    #[serde(rename = "In Bearbeitung")]
    InProgress,
    #[serde(rename = "Abgeschlossen")]
    Completed,
}

impl ProjectStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "Geplant",
            ProjectStatus::InProgress => "In Bearbeitung",
            ProjectStatus::Completed => "Abgeschlossen",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Geplant" => Some(ProjectStatus::Planned),
            "In Bearbeitung" => Some(ProjectStatus::InProgress),
            "Abgeschlossen" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub year: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub year: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerDraft {
    pub name: String,
    pub logo: String,
}

/// All editable site content.
///
/// The document itself enforces id uniqueness only. Presentation limits such
/// as the number of hero slides live in the admin editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(default)]
    pub hero_slides: Vec<HeroSlide>,
    #[serde(default)]
    pub about_image: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub partners: Vec<Partner>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
    #[error("invalid job: {0}")]
    Job(#[from] JobError),
    #[error("job `{id}` is invalid: {source}")]
    InvalidJob {
        id: String,
        #[source]
        source: JobError,
    },
}

fn not_found(kind: &'static str, id: &str) -> DocumentError {
    DocumentError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl ContentDocument {
    // ---- hero slides ----

    pub fn add_hero_slide(&mut self, ids: &dyn IdGenerator, draft: HeroSlideDraft) -> String {
        let id = fresh_id(ids, |c| self.hero_slides.iter().any(|s| s.id == c));
        self.hero_slides.push(HeroSlide {
            id: id.clone(),
            image: draft.image,
            title: draft.title,
            subtitle: draft.subtitle,
            button_text: draft.button_text,
            button_link: draft.button_link,
        });
        id
    }

    pub fn hero_slide_mut(&mut self, id: &str) -> Result<&mut HeroSlide, DocumentError> {
        self.hero_slides
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("hero slide", id))
    }

    pub fn remove_hero_slide(&mut self, id: &str) -> Result<HeroSlide, DocumentError> {
        let index = self
            .hero_slides
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| not_found("hero slide", id))?;
        Ok(self.hero_slides.remove(index))
    }

    pub fn set_hero_slide_image(&mut self, id: &str, image: String) -> Result<(), DocumentError> {
        self.hero_slide_mut(id)?.image = image;
        Ok(())
    }

    pub fn set_about_image(&mut self, image: String) {
        self.about_image = image;
    }

    // ---- projects ----

    pub fn add_project(&mut self, ids: &dyn IdGenerator, draft: ProjectDraft) -> String {
        let id = fresh_id(ids, |c| self.projects.iter().any(|p| p.id == c));
        self.projects.push(Project {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            image: draft.image,
            category: draft.category,
            year: draft.year,
            status: draft.status,
        });
        id
    }

    pub fn project_mut(&mut self, id: &str) -> Result<&mut Project, DocumentError> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("project", id))
    }

    pub fn remove_project(&mut self, id: &str) -> Result<Project, DocumentError> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found("project", id))?;
        Ok(self.projects.remove(index))
    }

    pub fn set_project_image(&mut self, id: &str, image: String) -> Result<(), DocumentError> {
        self.project_mut(id)?.image = image;
        Ok(())
    }

    // ---- partners ----

    pub fn add_partner(&mut self, ids: &dyn IdGenerator, draft: PartnerDraft) -> String {
        let id = fresh_id(ids, |c| self.partners.iter().any(|p| p.id == c));
        self.partners.push(Partner {
            id: id.clone(),
            name: draft.name,
            logo: draft.logo,
        });
        id
    }

    pub fn partner_mut(&mut self, id: &str) -> Result<&mut Partner, DocumentError> {
        self.partners
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("partner", id))
    }

    pub fn remove_partner(&mut self, id: &str) -> Result<Partner, DocumentError> {
        let index = self
            .partners
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found("partner", id))?;
        Ok(self.partners.remove(index))
    }

    pub fn set_partner_logo(&mut self, id: &str, logo: String) -> Result<(), DocumentError> {
        self.partner_mut(id)?.logo = logo;
        Ok(())
    }

    // ---- jobs ----

    /// Validates `draft` and appends a new job stamped with `now`.
    pub fn add_job(
        &mut self,
        ids: &dyn IdGenerator,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<String, DocumentError> {
        let draft = draft.validate()?;
        let id = fresh_id(ids, |c| self.jobs.iter().any(|j| j.id == c));
        self.jobs.push(Job::from_draft(id.clone(), now, draft));
        Ok(id)
    }

    /// Replaces the editable fields of a job. Id and creation time stay.
    pub fn update_job(&mut self, id: &str, draft: JobDraft) -> Result<(), DocumentError> {
        let draft = draft.validate()?;
        let job = self
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| not_found("job", id))?;
        *job = Job::from_draft(job.id.clone(), job.created_at, draft);
        Ok(())
    }

    pub fn remove_job(&mut self, id: &str) -> Result<Job, DocumentError> {
        let index = self
            .jobs
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(|| not_found("job", id))?;
        Ok(self.jobs.remove(index))
    }

    /// Flips `is_active` and returns the new value.
    pub fn toggle_job_status(&mut self, id: &str) -> Result<bool, DocumentError> {
        let job = self
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| not_found("job", id))?;
        job.is_active = !job.is_active;
        Ok(job.is_active)
    }

    /// Checks every stored job the way a job form submission is checked.
    /// Documents from outside the editor go through this before they are
    /// persisted.
    pub fn validate_jobs(&self) -> Result<(), DocumentError> {
        for job in &self.jobs {
            job.to_draft()
                .validate()
                .map_err(|source| DocumentError::InvalidJob {
                    id: job.id.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn active_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| j.is_active)
    }

    pub fn job_by_id(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    // ---- images ----

    /// Every image reference reachable from the document: hero images, the
    /// about image, project images and partner logos.
    pub fn image_refs(&self) -> impl Iterator<Item = &str> {
        self.hero_slides
            .iter()
            .map(|s| s.image.as_str())
            .chain(std::iter::once(self.about_image.as_str()))
            .chain(self.projects.iter().map(|p| p.image.as_str()))
            .chain(self.partners.iter().map(|p| p.logo.as_str()))
    }

    /// Store keys of all `local://` references in the document.
    pub fn local_image_keys(&self) -> BTreeSet<String> {
        self.image_refs()
            .filter_map(ImageRef::local_key)
            .map(str::to_string)
            .collect()
    }
}
