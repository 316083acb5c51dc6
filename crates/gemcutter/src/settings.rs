//! World configuration, loadable from JSON.
//!
//! ```json
//! {
//!   "entity_capacity": 4096,
//!   "allow_duplicate_components": false,
//!   "log_filter": "gemcutter=debug"
//! }
//! ```
//!
//! Every field is optional; missing ones take their [`Default`] value.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Entity slots reserved up front.
    pub entity_capacity: usize,
    /// Whether an entity may hold several components of one type. When
    /// `false`, adding a second one panics.
    pub allow_duplicate_components: bool,
    /// An `env_logger` filter, e.g. `"gemcutter=debug"`. `RUST_LOG` is used
    /// when unset.
    pub log_filter: Option<String>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            entity_capacity: 256,
            allow_duplicate_components: true,
            log_filter: None,
        }
    }
}

impl WorldSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Install `env_logger` with [`WorldSettings::log_filter`].
    ///
    /// Returns `false` if a logger was already installed.
    pub fn init_logging(&self) -> bool {
        let mut builder = match &self.log_filter {
            Some(filter) => {
                let mut builder = env_logger::Builder::new();
                builder.parse_filters(filter);
                builder
            }
            None => env_logger::Builder::from_default_env(),
        };
        builder.try_init().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings = WorldSettings::from_json_str(r#"{ "entity_capacity": 8 }"#).unwrap();
        assert_eq!(settings.entity_capacity, 8);
        assert!(settings.allow_duplicate_components);
        assert_eq!(settings.log_filter, None);

        assert_eq!(WorldSettings::from_json_str("{}").unwrap(), WorldSettings::default());
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = WorldSettings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("invalid settings"));
    }

    #[test]
    fn json_text_round_trips() {
        let settings = WorldSettings {
            entity_capacity: 12,
            allow_duplicate_components: false,
            log_filter: Some("gemcutter=trace".into()),
        };
        let json = settings.to_json_string().unwrap();
        assert_eq!(WorldSettings::from_json_str(&json).unwrap(), settings);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "allow_duplicate_components": false }}"#).unwrap();

        let settings = WorldSettings::from_file(file.path()).unwrap();
        assert!(!settings.allow_duplicate_components);
        assert_eq!(settings.entity_capacity, 256);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorldSettings::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn init_logging_twice_reports_existing_logger() {
        let settings = WorldSettings {
            log_filter: Some("warn".into()),
            ..WorldSettings::default()
        };
        settings.init_logging();
        assert!(!settings.init_logging());
    }
}
