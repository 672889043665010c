//! `scrape options`: reconfigure an entry in place

use anyhow::{Result, bail};
use scrape_core::{EntryHandle, OptionsFlow, StepId};

use super::{CommandContext, prompts};
use crate::args::{ConnectionArgs, SensorArgs};
use crate::console::ValidationSpinner;

pub async fn run(
    ctx: &CommandContext,
    entry_id: &str,
    sensor_index: usize,
    connection: &ConnectionArgs,
    sensor: &SensorArgs,
    interactive: bool,
) -> Result<()> {
    let console = ctx.console();
    let handle = EntryHandle::new(entry_id);
    let mut flow = OptionsFlow::for_sensor(ctx.validator(), ctx.store.clone(), &handle, sensor_index)?;

    console.print_header(&format!("Options for {}", flow.entry().title));
    flow.start()?;

    let mut params = connection.apply_to(flow.connection_defaults().clone())?;
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
            bail!("Connection step rejected, entry left unchanged");
        }
    }

    let mut input = sensor.apply_to(flow.entity_defaults().unwrap_or_default());
    loop {
        if interactive {
            input = prompts::sensor(&input, flow.probe(), &console)?;
        }

        let result = flow.submit_entity(input.clone())?;
        if result.is_create_entry() {
            console.success(&format!("Updated entry {}", handle));
            return Ok(());
        }

        console.form_errors(&result);
        if !interactive {
            bail!("Sensor step rejected, entry left unchanged");
        }
    }
}
