//! Interactive forms for the connection and sensor steps

use anyhow::Result;
use colored::*;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use scrape_core::flow::validate_entity;
use scrape_core::{ConnectionParameters, EntityInput, HttpMethod, ProbeHandle};

use crate::console::CliConsole;

/// Ask for every connection field, starting from `defaults`
pub fn connection(defaults: &ConnectionParameters) -> Result<ConnectionParameters> {
    let theme = ColorfulTheme::default();
    let mut params = defaults.clone();

    params.resource = Input::with_theme(&theme)
        .with_prompt("Resource URL")
        .with_initial_text(defaults.resource.clone())
        .allow_empty(true)
        .interact_text()?;

    let methods = HttpMethod::all();
    let current = methods
        .iter()
        .position(|m| *m == defaults.method)
        .unwrap_or(0);
    let selection = Select::with_theme(&theme)
        .with_prompt("Method")
        .items(&methods.iter().map(HttpMethod::as_str).collect::<Vec<_>>())
        .default(current)
        .interact()?;
    params.method = methods[selection];

    params.verify_ssl = Confirm::with_theme(&theme)
        .with_prompt("Verify SSL certificate?")
        .default(defaults.verify_ssl)
        .interact()?;

    params.timeout = Input::with_theme(&theme)
        .with_prompt("Timeout (seconds)")
        .default(defaults.timeout)
        .interact_text()?;

    let username: String = Input::with_theme(&theme)
        .with_prompt("Username (optional)")
        .with_initial_text(defaults.username.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    params.username = non_empty(username);

    let prompt = if defaults.password.is_some() {
        "Password (empty keeps the current one)"
    } else {
        "Password (optional)"
    };
    let password = Password::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    params.password = non_empty(password).or_else(|| defaults.password.clone());

    if params.method == HttpMethod::Post {
        let payload: String = Input::with_theme(&theme)
            .with_prompt("Payload (optional)")
            .with_initial_text(defaults.payload.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        params.payload = non_empty(payload);
    }

    Ok(params)
}

/// Ask for every sensor field, previewing the value against the probed page
pub fn sensor(defaults: &EntityInput, probe: Option<&ProbeHandle>, console: &CliConsole) -> Result<EntityInput> {
    let theme = ColorfulTheme::default();
    let mut input = defaults.clone();

    loop {
        input.name = Input::with_theme(&theme)
            .with_prompt("Sensor name")
            .with_initial_text(input.name.clone())
            .allow_empty(true)
            .interact_text()?;

        input.select = Input::with_theme(&theme)
            .with_prompt("CSS selector")
            .with_initial_text(input.select.clone())
            .allow_empty(true)
            .interact_text()?;

        input.index = Input::with_theme(&theme)
            .with_prompt("Index")
            .default(input.index)
            .interact_text()?;

        let attribute: String = Input::with_theme(&theme)
            .with_prompt("Attribute (empty reads the text)")
            .with_initial_text(input.attribute.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        input.attribute = non_empty(attribute);

        let unit: String = Input::with_theme(&theme)
            .with_prompt("Unit of measurement (optional)")
            .with_initial_text(input.unit_of_measurement.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        input.unit_of_measurement = non_empty(unit);

        let Some(probe) = probe else {
            return Ok(input);
        };

        // Invalid fields are reported by the flow itself
        let Ok(definition) = validate_entity(&input, &[]) else {
            return Ok(input);
        };

        match probe.preview(&definition) {
            Ok(value) => println!("  {} {}", "Preview:".dimmed(), value.cyan()),
            Err(e) => console.warn(&format!("Preview: {}", e)),
        }

        if Confirm::with_theme(&theme)
            .with_prompt("Use this sensor?")
            .default(true)
            .interact()?
        {
            return Ok(input);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
