// History configuration, stored as RON next to the other user settings

use crate::command::manager::DEFAULT_MAX_HISTORY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "history.ron";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for the command log and the session → view channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept before the oldest is dropped
    pub max_history: usize,
    /// Capacity of the view refresh ring buffer
    pub view_event_capacity: usize,
    /// Capacity of the warning ring buffer
    pub notification_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            view_event_capacity: 256,
            notification_capacity: 64,
        }
    }
}

impl HistoryConfig {
    /// Platform config location, e.g. `~/.config/timeline_undo/history.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("timeline_undo").join(CONFIG_FILE_NAME))
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: HistoryConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No history config, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::Invalid(
                "max_history must be at least 1".to_string(),
            ));
        }
        if self.view_event_capacity == 0 || self.notification_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel capacities must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = HistoryConfig::from_ron_str("(max_history: 20)").unwrap();

        assert_eq!(config.max_history, 20);
        assert_eq!(config.view_event_capacity, 256);
        assert_eq!(config.notification_capacity, 64);
    }

    #[test]
    fn test_zero_history_rejected() {
        let result = HistoryConfig::from_ron_str("(max_history: 0)");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let result = HistoryConfig::from_ron_str("(max_history: \"lots\")");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = HistoryConfig {
            max_history: 42,
            ..Default::default()
        };

        config.save(&path).unwrap();
        let loaded = HistoryConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HistoryConfig::load_or_default(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, HistoryConfig::default());
    }
}
