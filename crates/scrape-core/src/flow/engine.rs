//! Async driver shared by the setup and options flows

use tracing::debug;
use uuid::Uuid;

use super::FlowError;
use super::state::{FlowContext, FlowEvent, FlowState, StepOutput, transition};
use super::validator::{ProbeHandle, ResourceValidator};
use crate::model::{ConnectionParameters, EntityDefinition, EntityInput};

/// Owns one flow instance: its state, its context and the last good probe
pub(crate) struct FlowEngine {
    flow_id: String,
    state: FlowState,
    context: FlowContext,
    validator: ResourceValidator,
    probe: Option<ProbeHandle>,
}

impl FlowEngine {
    pub(crate) fn new(validator: ResourceValidator, context: FlowContext) -> Self {
        Self {
            flow_id: Uuid::new_v4().to_string(),
            state: FlowState::Start,
            context,
            validator,
            probe: None,
        }
    }

    pub(crate) fn flow_id(&self) -> &str {
        &self.flow_id
    }

    pub(crate) fn state(&self) -> &FlowState {
        &self.state
    }

    pub(crate) fn context(&self) -> &FlowContext {
        &self.context
    }

    pub(crate) fn probe(&self) -> Option<&ProbeHandle> {
        self.probe.as_ref()
    }

    /// Replace the sensors the submission is composed with
    pub(crate) fn set_existing(&mut self, existing: Vec<EntityDefinition>) {
        self.context.existing = existing;
    }

    fn apply(&mut self, event: FlowEvent) -> Result<StepOutput, FlowError> {
        let state = std::mem::replace(&mut self.state, FlowState::Start);
        let from = state.name();
        let (next, output) = transition(state, event, &self.context);
        debug!(flow_id = %self.flow_id, from, to = next.name(), "Flow step");

        if next.is_done() {
            self.probe = None;
        }
        self.state = next;
        output
    }

    pub(crate) fn begin(&mut self) -> Result<StepOutput, FlowError> {
        self.apply(FlowEvent::Begin)
    }

    /// Probe the parameters and feed the outcome to the sequencer
    ///
    /// Nothing is fetched unless the flow is waiting for connection input.
    pub(crate) async fn submit_connection(&mut self, params: ConnectionParameters) -> Result<StepOutput, FlowError> {
        match &self.state {
            FlowState::Connection => {}
            FlowState::Done => return Err(FlowError::AlreadyFinished),
            other => {
                return Err(FlowError::UnexpectedInput {
                    step: other.name(),
                    input: "connection",
                });
            }
        }

        let event = match self.validator.validate(params).await {
            Ok(handle) => {
                let params = handle.params().clone();
                self.probe = Some(handle);
                FlowEvent::ConnectionAccepted(params)
            }
            Err(e) => {
                self.probe = None;
                FlowEvent::ConnectionRejected(e)
            }
        };
        self.apply(event)
    }

    pub(crate) fn submit_entity(&mut self, input: EntityInput) -> Result<StepOutput, FlowError> {
        self.apply(FlowEvent::EntitySubmitted(input))
    }
}
