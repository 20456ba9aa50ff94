//! Application configuration.
//!
//! Configuration is read from TOML. Every key is optional; missing keys
//! fall back to the defaults of the airline service.
//!
//! ```toml
//! [service]
//! entity_set = "AirlineSet"
//! key_property = "AirlineID"
//! search_property = "AirlineName"
//!
//! [list]
//! selection_mode = "single-selection"
//! sort_by = "AirlineName"
//! sort_descending = false
//! group_by = "Currency"
//! batch_size = 32
//! ```

use std::path::Path;

use airline_md_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    AIRLINE_KEY_PROPERTY, AIRLINE_SET, Airline, AirlineKey, SelectionMode, SortKey, Sorter,
};

/// How the app addresses the entity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Entity set the list displays.
    pub entity_set: String,
    /// Key property identifying one entity of the set.
    pub key_property: String,
    /// Property the search field matches against.
    pub search_property: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            entity_set: AIRLINE_SET.to_string(),
            key_property: AIRLINE_KEY_PROPERTY.to_string(),
            search_property: "AirlineName".to_string(),
        }
    }
}

impl ServiceConfig {
    /// How list, service and routes address an airline.
    pub fn airline_key(&self) -> AirlineKey {
        AirlineKey::new(self.entity_set.as_str(), self.key_property.as_str())
    }
}

/// Behavior of the master list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub selection_mode: SelectionMode,
    pub sort_by: SortKey,
    pub sort_descending: bool,
    /// Groups the list by this key; ungrouped when absent.
    pub group_by: Option<SortKey>,
    /// Tasks processed per batch by the app's task queue.
    pub batch_size: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            selection_mode: SelectionMode::SingleSelection,
            sort_by: SortKey::AirlineName,
            sort_descending: false,
            group_by: None,
            batch_size: 32,
        }
    }
}

impl ListConfig {
    /// The initial sort order of the list.
    pub fn sorter(&self) -> Sorter {
        Sorter::new(self.sort_by, self.sort_descending)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub list: ListConfig,
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(target: targets::CONFIG, path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Writes the configuration to `path` as TOML.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))
    }

    fn validate(&self) -> Result<()> {
        if self.list.batch_size == 0 {
            return Err(Error::config("list.batch_size must be at least 1"));
        }
        if self.service.entity_set.is_empty() || self.service.key_property.is_empty() {
            return Err(Error::config("service.entity_set and service.key_property must be set"));
        }
        if !Airline::has_property(&self.service.key_property) {
            return Err(Error::config(format!(
                "service.key_property '{}' is not an airline property",
                self.service.key_property
            )));
        }
        if !Airline::has_property(&self.service.search_property) {
            return Err(Error::config(format!(
                "service.search_property '{}' is not an airline property",
                self.service.search_property
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.service.entity_set, "AirlineSet");
        assert_eq!(config.list.sorter(), Sorter::default());
    }

    #[test]
    fn test_partial_document() {
        let config = AppConfig::from_toml_str(
            r#"
            [list]
            selection_mode = "multi-selection"
            sort_by = "AirlineID"
            sort_descending = true
            "#,
        )
        .unwrap();

        assert_eq!(config.list.selection_mode, SelectionMode::MultiSelection);
        assert_eq!(config.list.sorter(), Sorter::new(SortKey::AirlineId, true));
        assert_eq!(config.list.batch_size, 32);
        assert_eq!(config.service.search_property, "AirlineName");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_toml_str("[list]\nbatch_size = 0").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = AppConfig::from_toml_str("[list]\nselection_mode = \"lasso\"").unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_airline_key_from_service_section() {
        let config = AppConfig::from_toml_str(
            r#"
            [service]
            entity_set = "CarrierSet"
            key_property = "AirlineName"

            [list]
            group_by = "Currency"
            "#,
        )
        .unwrap();

        let key = config.service.airline_key();
        assert_eq!(key.entity_set(), "CarrierSet");
        assert_eq!(key.path_for("Lufthansa"), "/CarrierSet('Lufthansa')");
        assert_eq!(config.list.group_by, Some(SortKey::Currency));
        assert_eq!(AppConfig::default().service.airline_key(), AirlineKey::default());

        let err = AppConfig::from_toml_str("[service]\nkey_property = \"Carrier\"").unwrap_err();
        assert!(err.to_string().contains("not an airline property"));
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airline.toml");

        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());

        let mut config = AppConfig::default();
        config.list.sort_by = SortKey::Currency;
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory exists but cannot be read as a file.
        let err = AppConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
