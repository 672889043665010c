//! `scrape show`: fetch resources and print sensor states

use anyhow::Result;
use colored::*;
use scrape_core::{EntryHandle, SensorRuntime, SensorState};

use super::CommandContext;

pub async fn run(ctx: &CommandContext, entry_id: Option<&str>, json: bool) -> Result<()> {
    let runtime = SensorRuntime::new(ctx.store.clone(), ctx.fetcher.clone());
    let states = match entry_id {
        Some(id) => runtime.refresh(&EntryHandle::new(id)).await?,
        None => runtime.states().await,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&states)?);
        return Ok(());
    }

    if states.is_empty() {
        ctx.console().warn("No sensors configured");
        return Ok(());
    }

    for state in &states {
        print_state(state);
    }
    Ok(())
}

fn print_state(state: &SensorState) {
    let value = match &state.unit_of_measurement {
        Some(unit) if state.is_available() => format!("{} {}", state.display_state(), unit),
        _ => state.display_state().to_string(),
    };

    if state.is_available() {
        println!("{} {}", state.entity_id.bold(), value.green());
    } else {
        println!("{} {}", state.entity_id.bold(), value.yellow());
        if let Some(error) = &state.error {
            println!("  {}", error.to_string().dimmed());
        }
    }
}
