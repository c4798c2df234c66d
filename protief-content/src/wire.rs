//! Shape of the document stored behind `/api/content`.
//!
//! The endpoint keeps numeric ids and groups sections differently from the
//! admin shape; jobs are not part of it. [`to_wire`] and [`from_wire`] are
//! total: every admin document maps to a wire document and back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::domain::{ContentDocument, HeroSlide, Job, Partner, Project, ProjectStatus};

pub const DEFAULT_BUTTON_TEXT: &str = "Mehr erfahren";
pub const DEFAULT_BUTTON_LINK: &str = "/leistungen";
pub const DEFAULT_PROJECT_CATEGORY: &str = "Allgemein";
pub const ABOUT_IMAGE_ALT: &str = "ProTief Team";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContent {
    pub hero: WireHero,
    #[serde(default)]
    pub about: WireAbout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<WireServices>,
    pub projects: Vec<WireProject>,
    pub partners: Vec<WirePartner>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireHero {
    #[serde(default)]
    pub slides: Vec<WireSlide>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSlide {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub image: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireAbout {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireServices {
    pub main_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProject {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub duration: String,
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePartner {
    pub id: u64,
    pub name: String,
    pub logo: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("content document does not match the expected schema: {0}")]
    Schema(#[from] serde_json::Error),
}

impl WireContent {
    /// Schema check at the boundary: succeeds only for documents carrying
    /// the `hero`, `projects` and `partners` sections with typed entries.
    pub fn from_value(value: Value) -> Result<Self, WireError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, WireError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Numeric wire ids for one collection, in order. Numeric ids are kept;
/// the others, and repeats such as `"01"` after `"1"`, get fresh numbers
/// above the largest numeric id so ids stay unique.
fn wire_ids<'a, I>(ids: I) -> Vec<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    let ids: Vec<&str> = ids.into_iter().collect();
    let mut next = ids
        .iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let mut used = HashSet::new();
    ids.iter()
        .map(|id| match id.parse::<u64>() {
            Ok(n) if used.insert(n) => n,
            _ => loop {
                next = next.wrapping_add(1);
                if used.insert(next) {
                    break next;
                }
            },
        })
        .collect()
}

pub fn to_wire(doc: &ContentDocument) -> WireContent {
    WireContent {
        hero: WireHero {
            slides: doc
                .hero_slides
                .iter()
                .zip(wire_ids(doc.hero_slides.iter().map(|s| s.id.as_str())))
                .map(|(s, id)| WireSlide {
                    id,
                    title: s.title.clone(),
                    subtitle: s.subtitle.clone(),
                    image: s.image.clone(),
                    alt: s.title.clone(),
                    button_text: Some(s.button_text.clone()),
                    button_link: Some(s.button_link.clone()),
                })
                .collect(),
        },
        about: WireAbout {
            image: doc.about_image.clone(),
            alt: ABOUT_IMAGE_ALT.to_string(),
        },
        services: None,
        projects: doc
            .projects
            .iter()
            .zip(wire_ids(doc.projects.iter().map(|p| p.id.as_str())))
            .map(|(p, id)| WireProject {
                id,
                title: p.title.clone(),
                location: String::new(),
                scope: p.category.clone(),
                duration: p.year.clone(),
                image: p.image.clone(),
                description: p.description.clone(),
                technologies: Vec::new(),
                status: p.status.label().to_string(),
                category: Some(p.category.clone()),
                year: Some(p.year.clone()),
            })
            .collect(),
        partners: doc
            .partners
            .iter()
            .zip(wire_ids(doc.partners.iter().map(|p| p.id.as_str())))
            .map(|(p, id)| WirePartner {
                id,
                name: p.name.clone(),
                logo: p.logo.clone(),
            })
            .collect(),
    }
}

/// Builds the admin document from the wire document. `jobs` supplies the
/// section the wire shape does not carry.
pub fn from_wire(wire: WireContent, jobs: Vec<Job>) -> ContentDocument {
    ContentDocument {
        hero_slides: wire
            .hero
            .slides
            .into_iter()
            .map(|s| HeroSlide {
                id: s.id.to_string(),
                image: s.image,
                title: s.title,
                subtitle: s.subtitle,
                button_text: s
                    .button_text
                    .unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string()),
                button_link: s
                    .button_link
                    .unwrap_or_else(|| DEFAULT_BUTTON_LINK.to_string()),
            })
            .collect(),
        about_image: wire.about.image,
        projects: wire
            .projects
            .into_iter()
            .map(|p| {
                let category = p
                    .category
                    .or_else(|| Some(p.scope).filter(|s| !s.is_empty()))
                    .unwrap_or_else(|| DEFAULT_PROJECT_CATEGORY.to_string());
                Project {
                    id: p.id.to_string(),
                    title: p.title,
                    description: p.description,
                    image: p.image,
                    category,
                    year: p.year.unwrap_or(p.duration),
                    status: ProjectStatus::from_label(&p.status).unwrap_or(ProjectStatus::Planned),
                }
            })
            .collect(),
        partners: wire
            .partners
            .into_iter()
            .map(|p| Partner {
                id: p.id.to_string(),
                name: p.name,
                logo: p.logo,
            })
            .collect(),
        jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_document;
    use serde_json::json;

    #[test]
    fn test_default_document_survives_wire_roundtrip() {
        let doc = default_document();
        let back = from_wire(to_wire(&doc), doc.jobs.clone());
        assert_eq!(back, doc);
    }

    #[test]
    fn test_from_value_requires_sections() {
        let missing_partners = json!({
            "hero": { "slides": [] },
            "projects": []
        });
        assert!(WireContent::from_value(missing_partners).is_err());
    }

    #[test]
    fn test_legacy_wire_document_is_accepted() {
        let legacy = json!({
            "hero": { "slides": [
                { "id": 1, "title": "Tiefbau", "subtitle": "NRW", "image": "/uploads/a.jpg", "alt": "Tiefbau" }
            ]},
            "about": { "image": "/uploads/about.jpg", "alt": "Team" },
            "services": { "mainImage": "/uploads/services.jpg" },
            "projects": [
                { "id": 3, "title": "Ausbau", "location": "Düsseldorf", "scope": "Glasfaser",
                  "duration": "2022", "image": "x.jpg", "description": "d",
                  "technologies": ["FTTH"], "status": "Abgeschlossen" }
            ],
            "partners": [ { "id": 9, "name": "BEW", "logo": "bew.png" } ]
        });

        let wire = WireContent::from_value(legacy).unwrap();
        let doc = from_wire(wire, Vec::new());

        assert_eq!(doc.hero_slides[0].id, "1");
        assert_eq!(doc.hero_slides[0].button_text, DEFAULT_BUTTON_TEXT);
        assert_eq!(doc.about_image, "/uploads/about.jpg");
        assert_eq!(doc.projects[0].category, "Glasfaser");
        assert_eq!(doc.projects[0].year, "2022");
        assert_eq!(doc.projects[0].status, ProjectStatus::Completed);
        assert_eq!(doc.partners[0].id, "9");
    }

    #[test]
    fn test_unknown_status_maps_to_planned() {
        let wire = WireContent::from_value(json!({
            "hero": { "slides": [] },
            "projects": [ { "id": 1, "title": "t", "image": "i", "status": "Pausiert" } ],
            "partners": []
        }))
        .unwrap();
        let doc = from_wire(wire, Vec::new());
        assert_eq!(doc.projects[0].status, ProjectStatus::Planned);
        assert_eq!(doc.projects[0].category, DEFAULT_PROJECT_CATEGORY);
    }

    #[test]
    fn test_non_numeric_ids_get_unused_numbers() {
        let mut doc = default_document();
        doc.partners.truncate(2);
        doc.partners[0].id = "2".into();
        doc.partners[1].id = "abc".into();

        let wire = to_wire(&doc);
        assert_eq!(wire.partners[0].id, 2);
        assert_eq!(wire.partners[1].id, 3);

        let back = from_wire(wire, Vec::new());
        assert_ne!(back.partners[0].id, back.partners[1].id);
    }

    #[test]
    fn test_repeated_numeric_ids_stay_unique() {
        assert_eq!(wire_ids(["1", "01", "x", "7"]), vec![1, 8, 9, 7]);
    }
}
