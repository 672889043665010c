//! Shape checks for the sensor step

use scraper::Selector;

use super::result::FormErrors;
use crate::model::{EntityDefinition, EntityInput};

/// Turn a sensor form submission into a definition
///
/// `others` are the sensors the configuration keeps next to this one; the
/// name must not collide with any of them.
pub fn validate_entity(input: &EntityInput, others: &[&EntityDefinition]) -> Result<EntityDefinition, FormErrors> {
    let mut errors = FormErrors::new();

    let name = input.name.trim();
    if name.is_empty() {
        errors.insert("name".to_string(), "name_required".to_string());
    } else if others.iter().any(|other| other.name == name) {
        errors.insert("name".to_string(), "name_exists".to_string());
    }

    let select = input.select.trim();
    if select.is_empty() {
        errors.insert("select".to_string(), "select_required".to_string());
    } else if Selector::parse(select).is_err() {
        errors.insert("select".to_string(), "invalid_selector".to_string());
    }

    let index = u32::try_from(input.index).ok();
    if index.is_none() {
        errors.insert("index".to_string(), "invalid_index".to_string());
    }

    let attribute = input
        .attribute
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);
    let unit = input
        .unit_of_measurement
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);

    match index {
        Some(index) if errors.is_empty() => Ok(EntityDefinition {
            name: name.to_string(),
            select: select.to_string(),
            index,
            attribute,
            unit_of_measurement: unit,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        let def = validate_entity(&EntityInput::new("Current version", ".current-version h1", 0), &[])
            .unwrap();
        assert_eq!(def, EntityDefinition::new("Current version", ".current-version h1", 0));
    }

    #[test]
    fn test_trims_and_drops_blank_optionals() {
        let mut input = EntityInput::new("  Price ", " span.price ", 1).with_attribute("  ");
        input.unit_of_measurement = Some("EUR".to_string());
        let def = validate_entity(&input, &[]).unwrap();
        assert_eq!(def.name, "Price");
        assert_eq!(def.select, "span.price");
        assert!(def.attribute.is_none());
        assert_eq!(def.unit_of_measurement.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_required_fields() {
        let errors = validate_entity(&EntityInput::default(), &[]).unwrap_err();
        assert_eq!(errors["name"], "name_required");
        assert_eq!(errors["select"], "select_required");
        assert!(!errors.contains_key("index"));
    }

    #[test]
    fn test_invalid_selector_and_index() {
        let errors = validate_entity(&EntityInput::new("Broken", "div[", -1), &[]).unwrap_err();
        assert_eq!(errors["select"], "invalid_selector");
        assert_eq!(errors["index"], "invalid_index");
    }

    #[test]
    fn test_fractional_index_from_form() {
        let input: EntityInput = serde_json::from_value(serde_json::json!({
            "name": "Current version",
            "select": ".current-version h1",
            "index": 0.5,
        }))
        .unwrap();
        let errors = validate_entity(&input, &[]).unwrap_err();
        assert_eq!(errors["index"], "invalid_index");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_duplicate_name() {
        let existing = EntityDefinition::new("Title", "h1", 0);
        let errors = validate_entity(&EntityInput::new("Title", "h2", 0), &[&existing]).unwrap_err();
        assert_eq!(errors["name"], "name_exists");
    }
}
