//! Subject store: subject key to full document text.

use advisor_core::{AppError, AppResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Read-only mapping of subject keys to subject documents.
///
/// Loaded once at startup. Keys iterate in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct SubjectStore {
    subjects: BTreeMap<String, String>,
}

impl SubjectStore {
    /// Load the store from a JSON object file.
    ///
    /// A missing file, malformed JSON, or a non-string value is an error.
    pub fn load(path: &Path) -> AppResult<Self> {
        tracing::debug!("Loading subject store from: {:?}", path);

        if !path.exists() {
            return Err(AppError::Knowledge(format!(
                "Subject store not found: {:?}. Run `advisor ingest` first.",
                path
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!("Failed to read subject store {:?}: {}", path, e))
        })?;

        let subjects: BTreeMap<String, String> =
            serde_json::from_str(&contents).map_err(|e| {
                AppError::Knowledge(format!("Malformed subject store {:?}: {}", path, e))
            })?;

        tracing::info!("Loaded {} subjects from {:?}", subjects.len(), path);

        Ok(Self { subjects })
    }

    pub fn from_map(subjects: BTreeMap<String, String>) -> Self {
        Self { subjects }
    }

    /// Document text for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.subjects.get(key).map(String::as_str)
    }

    /// All known subject keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.subjects.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Write the store as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.subjects)?;
        std::fs::write(path, json)?;

        tracing::debug!("Wrote {} subjects to {:?}", self.subjects.len(), path);
        Ok(())
    }
}
