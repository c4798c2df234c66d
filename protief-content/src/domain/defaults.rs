//! Bundled content used when neither the API nor a local copy is available.

use chrono::{DateTime, Utc};

use super::document::{ContentDocument, HeroSlide, Partner, Project, ProjectStatus};
use super::job::{Job, JobType};

// 2024-01-15T08:00:00Z
const DEFAULT_JOBS_CREATED_AT: i64 = 1_705_305_600;

fn slide(id: &str, image: &str, title: &str, subtitle: &str, button: (&str, &str)) -> HeroSlide {
    HeroSlide {
        id: id.into(),
        image: image.into(),
        title: title.into(),
        subtitle: subtitle.into(),
        button_text: button.0.into(),
        button_link: button.1.into(),
    }
}

fn partner(id: &str, name: &str, logo: &str) -> Partner {
    Partner {
        id: id.into(),
        name: name.into(),
        logo: logo.into(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn default_document() -> ContentDocument {
    let created_at = DateTime::<Utc>::from_timestamp(DEFAULT_JOBS_CREATED_AT, 0).unwrap_or_default();

    ContentDocument {
        hero_slides: vec![
            slide(
                "1",
                "https://images.unsplash.com/photo-1544197150-b99a580bb7a8?w=1920&h=800&fit=crop&q=60",
                "Glasfaser-Infrastruktur aus einer Hand",
                "Planung, Tiefbau, Installation und Wartung – alles aus einer Quelle.",
                ("Unsere Leistungen", "/leistungen"),
            ),
            slide(
                "2",
                "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=1920&h=800&fit=crop&q=60",
                "Moderne Glasfaser-Technologie",
                "Zuverlässige Internetverbindungen für Düsseldorf und Umgebung.",
                ("Kontakt aufnehmen", "/kontakt"),
            ),
            slide(
                "3",
                "https://images.unsplash.com/photo-1449824913935-59a10b8d2000?w=1920&h=800&fit=crop&q=60",
                "Professioneller Tiefbau",
                "Erfahrene Spezialisten für komplexe Infrastrukturprojekte.",
                ("Projekte ansehen", "/projekte"),
            ),
            slide(
                "4",
                "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=1920&h=800&fit=crop&q=60",
                "Digitale Zukunft gestalten",
                "Innovative Lösungen für nachhaltige Netzinfrastruktur.",
                ("Mehr erfahren", "/ueber-uns"),
            ),
        ],
        about_image:
            "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=600&h=400&fit=crop".into(),
        projects: vec![
            Project {
                id: "1".into(),
                title: "Glasfaser-Ausbau Stadtmitte".into(),
                description: "Verlegung von 15 km Glasfaserkabel im Düsseldorfer Stadtzentrum"
                    .into(),
                image: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400&h=300&fit=crop"
                    .into(),
                category: "Glasfaser".into(),
                year: "2023".into(),
                status: ProjectStatus::Completed,
            },
            Project {
                id: "2".into(),
                title: "Telekom-Infrastruktur Neubaugebiet".into(),
                description: "Komplette Telekommunikationsinfrastruktur für 200 Wohneinheiten"
                    .into(),
                image: "https://images.unsplash.com/photo-1581094794329-c8112a89af12?w=400&h=300&fit=crop"
                    .into(),
                category: "Telekommunikation".into(),
                year: "2023".into(),
                status: ProjectStatus::InProgress,
            },
        ],
        partners: vec![
            partner("1", "BEW", "https://via.placeholder.com/200x100/1e40af/ffffff?text=BEW"),
            partner(
                "2",
                "Deutsche Glasfaser",
                "https://via.placeholder.com/200x100/059669/ffffff?text=Deutsche+Glasfaser",
            ),
            partner(
                "3",
                "1&1 Versatel",
                "https://via.placeholder.com/200x100/0066cc/ffffff?text=1%261+Versatel",
            ),
            partner(
                "4",
                "NetCologne",
                "https://via.placeholder.com/200x100/ff6600/ffffff?text=NetCologne",
            ),
        ],
        jobs: vec![
            Job {
                id: "1".into(),
                title: "Tiefbau-Ingenieur (m/w/d)".into(),
                department: "Tiefbau".into(),
                location: "Düsseldorf".into(),
                job_type: JobType::Vollzeit,
                description: "Planung und Überwachung von Glasfaser-Infrastrukturprojekten in NRW."
                    .into(),
                requirements: strings(&[
                    "Abgeschlossenes Studium im Bauingenieurwesen oder vergleichbare Qualifikation",
                    "Mindestens 3 Jahre Berufserfahrung im Tiefbau",
                    "Kenntnisse in CAD-Software (AutoCAD, Civil 3D)",
                    "Führerschein Klasse B",
                ]),
                benefits: strings(&[
                    "Firmenwagen auch zur privaten Nutzung",
                    "Flexible Arbeitszeiten und Homeoffice-Möglichkeiten",
                    "30 Tage Urlaub",
                ]),
                salary: Some("55.000 - 75.000 €".into()),
                created_at,
                is_active: true,
            },
            Job {
                id: "2".into(),
                title: "Glasfaser-Techniker (m/w/d)".into(),
                department: "Telekommunikation".into(),
                location: "Düsseldorf".into(),
                job_type: JobType::Vollzeit,
                description: "Installation, Wartung und Reparatur von Glasfaser-Netzwerken.".into(),
                requirements: strings(&[
                    "Abgeschlossene Ausbildung als Elektroniker für Telekommunikationstechnik",
                    "Erfahrung mit Spleißen und OTDR-Messungen",
                    "Kenntnisse in FTTH, FTTB, GPON",
                ]),
                benefits: strings(&[
                    "Unbefristeter Arbeitsvertrag",
                    "Moderne Arbeitsausrüstung und Firmenwagen",
                    "Regelmäßige Schulungen und Zertifizierungen",
                ]),
                salary: Some("45.000 - 60.000 €".into()),
                created_at,
                is_active: true,
            },
            Job {
                id: "3".into(),
                title: "Auszubildender Elektroniker für Telekommunikationstechnik (m/w/d)".into(),
                department: "Ausbildung".into(),
                location: "Düsseldorf".into(),
                job_type: JobType::Ausbildung,
                description: "3,5-jährige Ausbildung in moderner Telekommunikationstechnik.".into(),
                requirements: strings(&[
                    "Mittlere Reife oder (Fach-)Abitur",
                    "Interesse an Technik und Elektronik",
                ]),
                benefits: strings(&[
                    "Übernahmegarantie bei guten Leistungen",
                    "Moderne Ausbildungswerkstätten",
                ]),
                salary: Some("700 - 1.000 € (je Ausbildungsjahr)".into()),
                created_at,
                is_active: true,
            },
            Job {
                id: "4".into(),
                title: "Praktikum Projektmanagement (m/w/d)".into(),
                department: "Projektmanagement".into(),
                location: "Düsseldorf".into(),
                job_type: JobType::Praktikum,
                description: "Mitarbeit bei Planung und Durchführung von Glasfaser-Großprojekten."
                    .into(),
                requirements: strings(&[
                    "Studium im Bereich Bauingenieurwesen, Wirtschaftsingenieurwesen oder BWL",
                    "Praktikumsdauer: 3-6 Monate",
                ]),
                benefits: strings(&[
                    "Faire Praktikumsvergütung",
                    "Mentoring durch erfahrene Projektleiter",
                ]),
                salary: Some("800 € (bei Vollzeit)".into()),
                created_at,
                is_active: true,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_shape() {
        let doc = default_document();
        assert_eq!(doc.hero_slides.len(), 4);
        assert_eq!(doc.projects.len(), 2);
        assert_eq!(doc.partners.len(), 4);
        assert!(doc.jobs.iter().all(|j| !j.requirements.is_empty() && !j.benefits.is_empty()));
        assert!(doc.local_image_keys().is_empty());
    }

    #[test]
    fn test_default_document_is_stable() {
        assert_eq!(default_document(), default_document());
    }
}
