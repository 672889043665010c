//! `scrape add`: run the setup flow

use anyhow::{Result, bail};
use scrape_core::{ConfigFlow, ConnectionParameters, EntityInput, StepId};

use super::{CommandContext, prompts};
use crate::args::{ConnectionArgs, SensorArgs};
use crate::console::ValidationSpinner;

pub async fn run(
    ctx: &CommandContext,
    connection: &ConnectionArgs,
    sensor: &SensorArgs,
    interactive: bool,
) -> Result<()> {
    let console = ctx.console();
    let mut flow = ConfigFlow::new(ctx.validator(), ctx.store.clone());

    console.print_header("Add scrape sensor");
    flow.start()?;
    console.info(&format!("Flow {}", flow.flow_id()));

    let mut params = connection.apply_to(ConnectionParameters::new(""))?;
    loop {
        if interactive {
            params = prompts::connection(&params)?;
        }

        let spinner = ValidationSpinner::new(&format!("Fetching {}...", params.resource));
        let result = flow.submit_connection(params.clone()).await?;
        if result.step_id == StepId::Sensor {
            spinner.finish_success("Resource reachable");
            break;
        }

        spinner.finish_error("Connection rejected");
        console.form_errors(&result);
        if !interactive {
            bail!("Connection step rejected");
        }
    }

    let mut input = sensor.apply_to(EntityInput::default());
    loop {
        if interactive {
            input = prompts::sensor(&input, flow.probe(), &console)?;
        }

        let result = flow.submit_entity(input.clone())?;
        if result.is_create_entry() {
            console.success(&format!(
                "Created entry {}",
                result.entry_id.as_deref().unwrap_or_default()
            ));
            if let Some(title) = &result.title {
                console.field("Title", title);
            }
            console.field("Store", &ctx.store.path().display().to_string());
            return Ok(());
        }

        console.form_errors(&result);
        if !interactive {
            bail!("Sensor step rejected");
        }
    }
}
