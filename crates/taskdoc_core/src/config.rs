//! Store configuration and path resolution.
//!
//! # Responsibility
//! - Decide which document file the store persists to, and in which format.
//!
//! # Invariants
//! - Resolution order is explicit value, then `TASKDOC_FILE`, then
//!   `./tasks.xml`.
//! - Blank values are treated as absent at every step.
//! - A `.json` path selects the JSON document; anything else is XML.

use crate::codec::DocumentFormat;
use std::path::{Path, PathBuf};

/// Default document file name, resolved against the working directory.
pub const DEFAULT_DOCUMENT_FILE_NAME: &str = "tasks.xml";
/// Environment variable overriding the document path.
pub const DOCUMENT_PATH_ENV: &str = "TASKDOC_FILE";

/// Settings for one `TaskStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    document_path: PathBuf,
}

impl StoreConfig {
    pub fn new(document_path: impl Into<PathBuf>) -> Self {
        Self {
            document_path: document_path.into(),
        }
    }

    /// Resolves the document path from an explicit value or the environment.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self::resolve_with(explicit, std::env::var(DOCUMENT_PATH_ENV).ok())
    }

    fn resolve_with(explicit: Option<PathBuf>, env_value: Option<String>) -> Self {
        if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
            return Self::new(path);
        }
        if let Some(raw) = env_value {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }
        Self::default()
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    /// Document format implied by the path's extension.
    pub fn document_format(&self) -> DocumentFormat {
        DocumentFormat::from_path(&self.document_path)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Path::new(".").join(DEFAULT_DOCUMENT_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use crate::codec::DocumentFormat;
    use std::path::{Path, PathBuf};

    #[test]
    fn explicit_path_wins_over_environment() {
        let config = StoreConfig::resolve_with(
            Some(PathBuf::from("/data/mine.xml")),
            Some("/env/other.xml".to_string()),
        );
        assert_eq!(config.document_path(), Path::new("/data/mine.xml"));
    }

    #[test]
    fn environment_is_trimmed_and_blank_falls_back_to_default() {
        let from_env = StoreConfig::resolve_with(None, Some("  /env/tasks.xml \n".to_string()));
        assert_eq!(from_env.document_path(), Path::new("/env/tasks.xml"));

        let blank = StoreConfig::resolve_with(Some(PathBuf::new()), Some("   ".to_string()));
        assert_eq!(blank, StoreConfig::default());
        assert_eq!(blank.document_path(), Path::new("./tasks.xml"));
    }

    #[test]
    fn json_extension_selects_json_format() {
        let json = StoreConfig::resolve_with(None, Some("/env/tasks.json".to_string()));
        assert_eq!(json.document_format(), DocumentFormat::Json);
        assert_eq!(StoreConfig::default().document_format(), DocumentFormat::Xml);
    }
}
