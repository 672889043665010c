//! Persisted configuration of a scrape entry

use serde::{Deserialize, Serialize};

use super::{ConnectionParameters, EntityDefinition};
use crate::config::defaults::ENTRY_VERSION;

/// Connection plus the sensors read from it
///
/// Serialized flat: the connection fields sit next to the `sensor` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(flatten)]
    pub connection: ConnectionParameters,
    #[serde(rename = "sensor", default)]
    pub entities: Vec<EntityDefinition>,
}

impl Configuration {
    pub fn new(connection: ConnectionParameters, entities: Vec<EntityDefinition>) -> Self {
        Self {
            connection,
            entities,
        }
    }

    /// Find a sensor by name
    pub fn entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Title for an entry holding this configuration
    pub fn title(&self) -> String {
        self.connection.resource.clone()
    }
}

/// A stored configuration with its host-assigned identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub title: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub options: Configuration,
}

fn default_version() -> u32 {
    ENTRY_VERSION
}

impl ConfigEntry {
    pub fn new(entry_id: impl Into<String>, title: impl Into<String>, options: Configuration) -> Self {
        Self {
            entry_id: entry_id.into(),
            title: title.into(),
            version: ENTRY_VERSION,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Configuration {
        Configuration::new(
            ConnectionParameters::new("https://example.org"),
            vec![EntityDefinition::new("Current version", ".current-version h1", 0)],
        )
    }

    #[test]
    fn test_flat_serialization() {
        assert_eq!(
            serde_json::to_value(sample()).unwrap(),
            json!({
                "resource": "https://example.org",
                "method": "GET",
                "verify_ssl": true,
                "timeout": 10.0,
                "sensor": [
                    {"name": "Current version", "select": ".current-version h1", "index": 0}
                ],
            })
        );
    }

    #[test]
    fn test_flat_deserialization() {
        let value = serde_json::to_value(sample()).unwrap();
        let back: Configuration = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_entity_lookup_and_title() {
        let config = sample();
        assert!(config.entity("Current version").is_some());
        assert!(config.entity("Other").is_none());
        assert_eq!(config.title(), "https://example.org");
    }

    #[test]
    fn test_entry_defaults_version() {
        let entry: ConfigEntry = serde_json::from_value(json!({
            "entry_id": "abc",
            "title": "https://example.org",
            "options": serde_json::to_value(sample()).unwrap(),
        }))
        .unwrap();
        assert_eq!(entry.version, 1);
    }
}
