//! Scrape sensors
//!
//! A sensor reads one element out of the fetched document: every match of its
//! CSS selector is collected, the match at `index` is picked, and its text (or
//! the configured attribute) becomes the sensor state.

mod runtime;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::EntityDefinition;

pub use runtime::SensorRuntime;

/// State string reported when a sensor has no value
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// Why a sensor has no value
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrapeError {
    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Index {index} not found, selector matched {matches} element(s)")]
    IndexOutOfRange { index: u32, matches: usize },

    #[error("Attribute '{attribute}' not found on the selected element")]
    AttributeMissing { attribute: String },

    #[error("Resource could not be fetched: {0}")]
    Fetch(String),
}

/// Read a sensor value out of a document
pub fn extract_value(document: &str, definition: &EntityDefinition) -> Result<String, ScrapeError> {
    let html = Html::parse_document(document);
    extract_from(&html, definition)
}

pub(crate) fn extract_from(html: &Html, definition: &EntityDefinition) -> Result<String, ScrapeError> {
    let selector = Selector::parse(&definition.select)
        .map_err(|_| ScrapeError::InvalidSelector(definition.select.clone()))?;

    let matches: Vec<_> = html.select(&selector).collect();
    let element = matches
        .get(definition.index as usize)
        .ok_or(ScrapeError::IndexOutOfRange {
            index: definition.index,
            matches: matches.len(),
        })?;

    match &definition.attribute {
        Some(attribute) => element
            .value()
            .attr(attribute)
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::AttributeMissing {
                attribute: attribute.clone(),
            }),
        None => Ok(element.text().collect::<String>().trim().to_string()),
    }
}

/// Entity id fragment derived from a sensor name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug.to_string()
    }
}

/// A configured sensor bound to its entry
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeSensor {
    pub entry_id: String,
    pub entity_id: String,
    pub definition: EntityDefinition,
}

impl ScrapeSensor {
    pub fn from_definition(entry_id: impl Into<String>, definition: EntityDefinition) -> Self {
        Self {
            entry_id: entry_id.into(),
            entity_id: format!("sensor.{}", slugify(&definition.name)),
            definition,
        }
    }

    /// Render this sensor against a parsed document
    pub(crate) fn render(&self, html: &Html) -> SensorState {
        match extract_from(html, &self.definition) {
            Ok(value) => self.state(Some(value), None),
            Err(error) => {
                tracing::warn!(
                    entity_id = %self.entity_id,
                    select = %self.definition.select,
                    error = %error,
                    "Sensor value unavailable"
                );
                self.state(None, Some(error))
            }
        }
    }

    pub(crate) fn state(&self, value: Option<String>, error: Option<ScrapeError>) -> SensorState {
        SensorState {
            entity_id: self.entity_id.clone(),
            entry_id: self.entry_id.clone(),
            name: self.definition.name.clone(),
            state: value,
            unit_of_measurement: self.definition.unit_of_measurement.clone(),
            error,
        }
    }
}

/// Rendered value of a sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorState {
    pub entity_id: String,
    pub entry_id: String,
    pub name: String,
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ScrapeError>,
}

impl SensorState {
    pub fn is_available(&self) -> bool {
        self.state.is_some()
    }

    /// State as shown to users
    pub fn display_state(&self) -> &str {
        self.state.as_deref().unwrap_or(STATE_UNAVAILABLE)
    }
}
