use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONTEXT_MESSAGE_SIZE: usize = 64;

/// Overrides `contextMessageSize` when set.
pub const CONTEXT_SIZE_ENV: &str = "WEFT_CONTEXT_SIZE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid WEFT_CONTEXT_SIZE value {0:?}: expected a non-negative integer")]
    InvalidEnv(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Number of trailing messages sent as context. 0 disables trimming.
    pub context_message_size: usize,
    /// Close open reasoning when a chunk reports a finish reason.
    pub close_reasoning_on_finish: bool,
    /// Put the parts of a finished message in priority order.
    pub sort_parts_on_finish: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            context_message_size: DEFAULT_CONTEXT_MESSAGE_SIZE,
            close_reasoning_on_finish: true,
            sort_parts_on_finish: false,
        }
    }
}

impl HistoryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_context_size_override(std::env::var(CONTEXT_SIZE_ENV).ok())
    }

    fn with_context_size_override(mut self, raw: Option<String>) -> Result<Self, ConfigError> {
        if let Some(raw) = raw {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.context_message_size = trimmed
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv(raw.clone()))?;
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config = HistoryConfig::from_json_str(r#"{"contextMessageSize": 8}"#).unwrap();
        assert_eq!(config.context_message_size, 8);
        assert!(config.close_reasoning_on_finish);
        assert!(!config.sort_parts_on_finish);
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"contextMessageSize": 0, "sortPartsOnFinish": true}}"#
        )
        .unwrap();

        let config = HistoryConfig::load(file.path()).unwrap();
        assert_eq!(config.context_message_size, 0);
        assert!(config.sort_parts_on_finish);
    }

    #[test]
    fn test_load_reports_missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            HistoryConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            HistoryConfig::load(&bad),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_context_size_override() {
        let config = HistoryConfig::default()
            .with_context_size_override(Some(" 12 ".to_string()))
            .unwrap();
        assert_eq!(config.context_message_size, 12);

        let config = HistoryConfig::default()
            .with_context_size_override(Some(String::new()))
            .unwrap();
        assert_eq!(config.context_message_size, DEFAULT_CONTEXT_MESSAGE_SIZE);

        assert!(matches!(
            HistoryConfig::default().with_context_size_override(Some("-1".to_string())),
            Err(ConfigError::InvalidEnv(_))
        ));
    }
}
