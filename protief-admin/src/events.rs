//! Notifications published by the content manager.

use std::fmt;

/// Where a save ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMethod {
    Api,
    LocalStorage,
}

impl fmt::Display for SaveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveMethod::Api => write!(f, "api"),
            SaveMethod::LocalStorage => write!(f, "localStorage"),
        }
    }
}

/// Published once per save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSaved {
    pub success: bool,
    pub method: SaveMethod,
    pub error: Option<String>,
}

impl ContentSaved {
    /// Status line shown to the editor after saving.
    pub fn status_message(&self) -> String {
        match (self.success, self.method) {
            (false, _) => format!(
                "❌ Fehler beim Speichern: {}",
                self.error.as_deref().unwrap_or("Unbekannter Fehler")
            ),
            (true, SaveMethod::Api) => {
                "✅ Erfolgreich gespeichert (content.json aktualisiert)".to_string()
            }
            (true, SaveMethod::LocalStorage) if self.error.is_some() => {
                "✅ Erfolgreich gespeichert (nur lokal - Server nicht verfügbar)".to_string()
            }
            (true, SaveMethod::LocalStorage) => "✅ Erfolgreich gespeichert".to_string(),
        }
    }
}

/// Published whenever the stored content changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentUpdated;
