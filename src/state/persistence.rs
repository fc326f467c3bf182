use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::file_handler::DEFAULT_EXPORT_NAME;
use crate::tool::Style;

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to (de)serialize config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Settings a paint session starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Most snapshots kept for undo; `None` keeps every one
    pub history_limit: Option<usize>,
    /// Skip committing a gesture that left the pixels unchanged
    pub skip_unchanged_commits: bool,
    pub style: Style,
    pub export_file_name: String,
    /// Extra TTF/OTF fonts for the Text tool, by family name
    pub font_files: BTreeMap<String, PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            history_limit: None,
            skip_unchanged_commits: false,
            style: Style::default(),
            export_file_name: DEFAULT_EXPORT_NAME.to_owned(),
            font_files: BTreeMap::new(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> PersistenceResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PersistenceError::InvalidConfig(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.history_limit == Some(0) {
            return Err(PersistenceError::InvalidConfig(
                "history_limit must keep at least one snapshot".to_owned(),
            ));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(PersistenceError::InvalidConfig(
                "export_file_name must not be empty".to_owned(),
            ));
        }
        if let Some(family) = self.font_files.keys().find(|f| f.trim().is_empty()) {
            return Err(PersistenceError::InvalidConfig(format!(
                "font family name {family:?} must not be empty"
            )));
        }
        Ok(())
    }

    /// Read and validate a JSON config. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> PersistenceResult<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut config = SessionConfig {
            canvas_width: 320,
            canvas_height: 240,
            history_limit: Some(20),
            ..SessionConfig::default()
        };
        config.style.set_brush_width(12.0);
        config.save(&path).unwrap();

        assert_eq!(SessionConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{ "canvas_width": 64 }"#).unwrap();
        assert_eq!(config.canvas_width, 64);
        assert_eq!(config.canvas_height, 600);
        assert_eq!(config.history_limit, None);
        assert_eq!(config.export_file_name, "canvas_image.png");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{ "canvas_width": 0 }"#).unwrap();

        let result = SessionConfig::load(&path);
        assert!(matches!(result, Err(PersistenceError::InvalidConfig(_))));

        let zero_limit = SessionConfig {
            history_limit: Some(0),
            ..SessionConfig::default()
        };
        assert!(zero_limit.validate().is_err());

        let mut blank_font = SessionConfig::default();
        blank_font
            .font_files
            .insert("  ".to_owned(), PathBuf::from("font.ttf"));
        assert!(matches!(
            blank_font.validate(),
            Err(PersistenceError::InvalidConfig(_))
        ));
    }
}
