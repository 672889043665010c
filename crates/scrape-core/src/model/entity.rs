//! Sensor definitions

use serde::{Deserialize, Deserializer, Serialize};

/// A single scraped sensor: which element to read and what to call it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    /// CSS selector
    pub select: String,
    /// Which match of the selector to read
    #[serde(default)]
    pub index: u32,
    /// Read this attribute instead of the element text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
}

impl EntityDefinition {
    pub fn new(name: impl Into<String>, select: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            select: select.into(),
            index,
            attribute: None,
            unit_of_measurement: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measurement = Some(unit.into());
        self
    }
}

/// Raw sensor form input, before shape checks
///
/// Every field is optional at the serde level so that missing fields surface
/// as form errors instead of deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub select: String,
    /// Forms submit numbers as floats; whole floats are accepted, anything
    /// else becomes a negative index and is rejected by the form
    #[serde(default, deserialize_with = "deserialize_index")]
    pub index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
}

impl EntityInput {
    pub fn new(name: impl Into<String>, select: impl Into<String>, index: i64) -> Self {
        Self {
            name: name.into(),
            select: select.into(),
            index,
            attribute: None,
            unit_of_measurement: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// Index value that no whole number maps to
const UNREPRESENTABLE_INDEX: i64 = -1;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Int(i64),
    Float(f64),
}

fn deserialize_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawIndex::deserialize(deserializer)? {
        RawIndex::Int(index) => index,
        RawIndex::Float(value)
            if value.fract() == 0.0 && value >= 0.0 && value <= i64::MAX as f64 =>
        {
            value as i64
        }
        RawIndex::Float(_) => UNREPRESENTABLE_INDEX,
    })
}

impl From<&EntityDefinition> for EntityInput {
    fn from(def: &EntityDefinition) -> Self {
        Self {
            name: def.name.clone(),
            select: def.select.clone(),
            index: i64::from(def.index),
            attribute: def.attribute.clone(),
            unit_of_measurement: def.unit_of_measurement.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_serialization() {
        let def = EntityDefinition::new("Current version", ".current-version h1", 0);
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({"name": "Current version", "select": ".current-version h1", "index": 0})
        );
    }

    #[test]
    fn test_input_tolerates_missing_fields() {
        let input: EntityInput = serde_json::from_value(json!({"select": "h1"})).unwrap();
        assert!(input.name.is_empty());
        assert_eq!(input.index, 0);
    }

    #[test]
    fn test_input_accepts_whole_float_index() {
        let input: EntityInput = serde_json::from_value(json!({
            "name": "Current version",
            "select": ".current-version h1",
            "index": 0.0,
        }))
        .unwrap();
        assert_eq!(input, EntityInput::new("Current version", ".current-version h1", 0));

        let input: EntityInput = serde_json::from_value(json!({"index": 3.0})).unwrap();
        assert_eq!(input.index, 3);
    }

    #[test]
    fn test_input_maps_fractional_index_to_negative() {
        for index in [json!(1.5), json!(-2.0), json!(1e300)] {
            let input: EntityInput = serde_json::from_value(json!({"index": index})).unwrap();
            assert!(input.index < 0, "index {:?}", index);
        }
    }

    #[test]
    fn test_input_from_definition() {
        let def = EntityDefinition::new("Price", "span.price", 2).with_attribute("data-value");
        let input = EntityInput::from(&def);
        assert_eq!(input.index, 2);
        assert_eq!(input.attribute.as_deref(), Some("data-value"));
    }
}
