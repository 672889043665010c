//! What a flow hands back after each step

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ConfigEntry, Configuration};

/// Field name to error code, `base` for errors not tied to a field
pub type FormErrors = BTreeMap<String, String>;

/// Field key for errors that concern the whole form
pub const BASE_ERROR_KEY: &str = "base";

/// Identifier of a form step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Connection step of the setup flow
    User,
    /// Connection step of the options flow
    Init,
    /// Sensor definition step of both flows
    Sensor,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::User => "user",
            StepId::Init => "init",
            StepId::Sensor => "sensor",
        }
    }

    /// Get the step title
    pub fn title(&self) -> &'static str {
        match self {
            StepId::User | StepId::Init => "Resource",
            StepId::Sensor => "Sensor",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of step result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowResultType {
    /// A form to fill in, possibly with errors from the last submission
    Form,
    /// The flow finished and its configuration was stored
    CreateEntry,
}

/// Result of starting a flow or submitting one of its steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowResult {
    pub flow_id: String,
    #[serde(rename = "type")]
    pub kind: FlowResultType,
    pub step_id: StepId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FormErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Configuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
}

impl FlowResult {
    pub fn form(flow_id: impl Into<String>, step_id: StepId, errors: FormErrors) -> Self {
        Self {
            flow_id: flow_id.into(),
            kind: FlowResultType::Form,
            step_id,
            errors,
            title: None,
            options: None,
            version: None,
            entry_id: None,
        }
    }

    pub fn create_entry(flow_id: impl Into<String>, step_id: StepId, entry: ConfigEntry) -> Self {
        Self {
            flow_id: flow_id.into(),
            kind: FlowResultType::CreateEntry,
            step_id,
            errors: FormErrors::new(),
            title: Some(entry.title),
            options: Some(entry.options),
            version: Some(entry.version),
            entry_id: Some(entry.entry_id),
        }
    }

    pub fn is_form(&self) -> bool {
        self.kind == FlowResultType::Form
    }

    pub fn is_create_entry(&self) -> bool {
        self.kind == FlowResultType::CreateEntry
    }

    /// Error code reported for a field, if any
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionParameters, EntityDefinition};
    use serde_json::json;

    #[test]
    fn test_form_result_serialization() {
        let mut errors = FormErrors::new();
        errors.insert(BASE_ERROR_KEY.to_string(), "resource_error".to_string());
        let result = FlowResult::form("flow-1", StepId::User, errors);

        assert!(result.is_form());
        assert_eq!(result.error("base"), Some("resource_error"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "flow_id": "flow-1",
                "type": "form",
                "step_id": "user",
                "errors": {"base": "resource_error"},
            })
        );
    }

    #[test]
    fn test_create_entry_result() {
        let options = Configuration::new(
            ConnectionParameters::new("https://example.org"),
            vec![EntityDefinition::new("Title", "h1", 0)],
        );
        let entry = ConfigEntry::new("entry-1", "https://example.org", options.clone());
        let result = FlowResult::create_entry("flow-1", StepId::Sensor, entry);

        assert!(result.is_create_entry());
        assert_eq!(result.title.as_deref(), Some("https://example.org"));
        assert_eq!(result.version, Some(1));
        assert_eq!(result.options, Some(options));
        assert_eq!(serde_json::to_value(&result).unwrap()["type"], "create_entry");
    }

    #[test]
    fn test_step_id_display() {
        assert_eq!(StepId::User.to_string(), "user");
        assert_eq!(StepId::Init.as_str(), "init");
        assert_eq!(StepId::Sensor.title(), "Sensor");
    }
}
