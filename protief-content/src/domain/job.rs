use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    Vollzeit,
    Teilzeit,
    Praktikum,
    Ausbildung,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Vollzeit => "Vollzeit",
            JobType::Teilzeit => "Teilzeit",
            JobType::Praktikum => "Praktikum",
            JobType::Ausbildung => "Ausbildung",
        }
    }
}

/// A job posting shown on the career page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Editable fields of a job, as submitted by the job form.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub department: String,
    pub location: String,
    pub job_type: JobType,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub salary: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("field `{0}` must not be empty")]
    MissingField(&'static str),
    #[error("at least one requirement is needed")]
    NoRequirements,
    #[error("at least one benefit is needed")]
    NoBenefits,
}

impl JobDraft {
    /// Drops blank list entries and checks the required fields.
    ///
    /// A draft that fails here must never reach a persistence call.
    pub fn validate(self) -> Result<JobDraft, JobError> {
        for (name, value) in [
            ("title", &self.title),
            ("department", &self.department),
            ("location", &self.location),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(JobError::MissingField(name));
            }
        }

        let requirements = drop_blank(self.requirements);
        if requirements.is_empty() {
            return Err(JobError::NoRequirements);
        }
        let benefits = drop_blank(self.benefits);
        if benefits.is_empty() {
            return Err(JobError::NoBenefits);
        }
        let salary = self.salary.filter(|s| !s.trim().is_empty());

        Ok(JobDraft {
            requirements,
            benefits,
            salary,
            ..self
        })
    }
}

fn drop_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .collect()
}

impl Job {
    /// Builds a job from an already validated draft.
    pub fn from_draft(id: String, created_at: DateTime<Utc>, draft: JobDraft) -> Self {
        Self {
            id,
            title: draft.title,
            department: draft.department,
            location: draft.location,
            job_type: draft.job_type,
            description: draft.description,
            requirements: draft.requirements,
            benefits: draft.benefits,
            salary: draft.salary,
            created_at,
            is_active: draft.is_active,
        }
    }

    /// Draft pre-filled with this job's fields, for editing.
    pub fn to_draft(&self) -> JobDraft {
        JobDraft {
            title: self.title.clone(),
            department: self.department.clone(),
            location: self.location.clone(),
            job_type: self.job_type,
            description: self.description.clone(),
            requirements: self.requirements.clone(),
            benefits: self.benefits.clone(),
            salary: self.salary.clone(),
            is_active: self.is_active,
        }
    }
}
