//! Setup flow: creates a new entry

use std::sync::Arc;

use tracing::info;

use super::FlowError;
use super::engine::FlowEngine;
use super::result::{FlowResult, StepId};
use super::state::{FlowContext, FlowState, StepOutput};
use super::validator::{ProbeHandle, ResourceValidator};
use crate::model::{ConnectionParameters, EntityInput};
use crate::store::EntryStore;

/// Guides the user from a resource URL to a stored scrape entry
pub struct ConfigFlow {
    engine: FlowEngine,
    store: Arc<dyn EntryStore>,
}

impl ConfigFlow {
    pub fn new(validator: ResourceValidator, store: Arc<dyn EntryStore>) -> Self {
        Self {
            engine: FlowEngine::new(validator, FlowContext::setup()),
            store,
        }
    }

    pub fn flow_id(&self) -> &str {
        self.engine.flow_id()
    }

    pub fn state(&self) -> &FlowState {
        self.engine.state()
    }

    /// Step the next submission goes to
    pub fn current_step(&self) -> Option<StepId> {
        self.engine.state().step_id(self.engine.context())
    }

    /// The probe that validated the connection step, while the flow runs
    pub fn probe(&self) -> Option<&ProbeHandle> {
        self.engine.probe()
    }

    /// Show the connection form
    pub fn start(&mut self) -> Result<FlowResult, FlowError> {
        let output = self.engine.begin()?;
        self.finish_step(output)
    }

    /// Submit the connection step
    ///
    /// A failed probe re-shows the connection form with `resource_error`.
    pub async fn submit_connection(&mut self, params: ConnectionParameters) -> Result<FlowResult, FlowError> {
        let output = self.engine.submit_connection(params).await?;
        self.finish_step(output)
    }

    /// Submit the sensor step; on success the entry is created
    pub fn submit_entity(&mut self, input: EntityInput) -> Result<FlowResult, FlowError> {
        let output = self.engine.submit_entity(input)?;
        self.finish_step(output)
    }

    fn finish_step(&self, output: StepOutput) -> Result<FlowResult, FlowError> {
        match output {
            StepOutput::Form { step_id, errors } => {
                Ok(FlowResult::form(self.flow_id(), step_id, errors))
            }
            StepOutput::Complete { title, options } => {
                let entry = self.store.create_entry(&title, options)?;
                info!(flow_id = %self.flow_id(), entry_id = %entry.entry_id, "Setup flow finished");
                Ok(FlowResult::create_entry(self.flow_id(), StepId::Sensor, entry))
            }
        }
    }
}
