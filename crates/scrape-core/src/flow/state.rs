//! Step sequencing for the setup and options flows
//!
//! The sequencing itself is a pure function over [`FlowState`]; the drivers
//! run the probe and feed its outcome in as a [`FlowEvent`].

use super::FlowError;
use super::ValidationError;
use super::entity_form::validate_entity;
use super::result::{FormErrors, StepId};
use crate::model::{Configuration, ConnectionParameters, EntityDefinition, EntityInput};

/// Where a flow currently is
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// Created, no form shown yet
    Start,
    /// Waiting for connection parameters
    Connection,
    /// Connection validated, waiting for the sensor definition
    EntityDefinition { connection: ConnectionParameters },
    /// Finished
    Done,
}

impl FlowState {
    /// Step a submission would currently be routed to
    pub fn step_id(&self, context: &FlowContext) -> Option<StepId> {
        match self {
            FlowState::Connection => Some(context.connection_step),
            FlowState::EntityDefinition { .. } => Some(StepId::Sensor),
            FlowState::Start | FlowState::Done => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, FlowState::Done)
    }

    /// Short name used in logs and errors
    pub(crate) fn name(&self) -> &'static str {
        match self {
            FlowState::Start => "start",
            FlowState::Connection => "connection",
            FlowState::EntityDefinition { .. } => "sensor",
            FlowState::Done => "done",
        }
    }
}

/// Input to the sequencer
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// Show the first form
    Begin,
    /// The connection step was submitted and the probe failed
    ConnectionRejected(ValidationError),
    /// The connection step was submitted and the probe succeeded
    ConnectionAccepted(ConnectionParameters),
    /// The sensor step was submitted
    EntitySubmitted(EntityInput),
}

impl FlowEvent {
    fn describe(&self) -> &'static str {
        match self {
            FlowEvent::Begin => "begin",
            FlowEvent::ConnectionRejected(_) | FlowEvent::ConnectionAccepted(_) => "connection",
            FlowEvent::EntitySubmitted(_) => "sensor",
        }
    }
}

/// What the sequencer emits for one event
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput {
    /// Show a form, with errors from the last submission
    Form { step_id: StepId, errors: FormErrors },
    /// The flow produced its final configuration
    Complete { title: String, options: Configuration },
}

/// Fixed facts about a flow instance
#[derive(Debug, Clone, PartialEq)]
pub struct FlowContext {
    /// Step id of the connection form
    pub connection_step: StepId,
    /// Sensors the configuration already has
    pub existing: Vec<EntityDefinition>,
    /// Which existing sensor the submission replaces; `None` appends
    pub slot: Option<usize>,
}

impl FlowContext {
    /// Context of the setup flow: nothing stored yet
    pub fn setup() -> Self {
        Self {
            connection_step: StepId::User,
            existing: Vec::new(),
            slot: None,
        }
    }

    /// Context of the options flow editing sensor `slot` of `existing`
    pub fn options(existing: Vec<EntityDefinition>, slot: usize) -> Self {
        Self {
            connection_step: StepId::Init,
            existing,
            slot: Some(slot),
        }
    }

    /// Sensors the edited one has to be distinct from
    fn others(&self) -> Vec<&EntityDefinition> {
        self.existing
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != self.slot)
            .map(|(_, def)| def)
            .collect()
    }

    /// Sensor list after placing `definition`
    fn compose(&self, definition: EntityDefinition) -> Vec<EntityDefinition> {
        let mut entities = self.existing.clone();
        match self.slot {
            Some(i) if i < entities.len() => entities[i] = definition,
            _ => entities.push(definition),
        }
        entities
    }
}

/// Advance a flow by one event
///
/// An event the current state does not accept leaves the state untouched and
/// reports an error.
pub fn transition(
    state: FlowState,
    event: FlowEvent,
    context: &FlowContext,
) -> (FlowState, Result<StepOutput, FlowError>) {
    match (state, event) {
        (FlowState::Start, FlowEvent::Begin) => (
            FlowState::Connection,
            Ok(StepOutput::Form {
                step_id: context.connection_step,
                errors: FormErrors::new(),
            }),
        ),
        (FlowState::Connection, FlowEvent::ConnectionRejected(error)) => (
            FlowState::Connection,
            Ok(StepOutput::Form {
                step_id: context.connection_step,
                errors: error.to_form_errors(),
            }),
        ),
        (FlowState::Connection, FlowEvent::ConnectionAccepted(connection)) => (
            FlowState::EntityDefinition { connection },
            Ok(StepOutput::Form {
                step_id: StepId::Sensor,
                errors: FormErrors::new(),
            }),
        ),
        (FlowState::EntityDefinition { connection }, FlowEvent::EntitySubmitted(input)) => {
            match validate_entity(&input, &context.others()) {
                Ok(definition) => {
                    let options = Configuration::new(connection, context.compose(definition));
                    (
                        FlowState::Done,
                        Ok(StepOutput::Complete {
                            title: options.title(),
                            options,
                        }),
                    )
                }
                Err(errors) => (
                    FlowState::EntityDefinition { connection },
                    Ok(StepOutput::Form {
                        step_id: StepId::Sensor,
                        errors,
                    }),
                ),
            }
        }
        (FlowState::Done, _) => (FlowState::Done, Err(FlowError::AlreadyFinished)),
        (state, event) => {
            let error = FlowError::UnexpectedInput {
                step: state.name(),
                input: event.describe(),
            };
            (state, Err(error))
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
