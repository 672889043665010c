//! Setup and options flows for scrape sensors
//!
//! Both flows walk the same two steps:
//! - connection: resource URL and HTTP options, probed once against the resource
//! - sensor: name, CSS selector and match index
//!
//! The setup flow creates a new entry; the options flow replaces the
//! configuration of an existing one in place.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use scrape_core::{
//!     ConfigFlow, ConnectionParameters, EntityInput, HttpFetcher, InMemoryEntryStore,
//!     ResourceValidator,
//! };
//!
//! # async fn run() -> Result<(), scrape_core::FlowError> {
//! let validator = ResourceValidator::new(Arc::new(HttpFetcher::default()));
//! let store = Arc::new(InMemoryEntryStore::new());
//! let mut flow = ConfigFlow::new(validator, store);
//!
//! flow.start()?;
//! flow.submit_connection(ConnectionParameters::new("https://example.org")).await?;
//! let result = flow.submit_entity(EntityInput::new("Heading", "h1", 0))?;
//! assert!(result.is_create_entry());
//! # Ok(())
//! # }
//! ```

mod config_flow;
mod engine;
mod entity_form;
mod options_flow;
mod result;
mod state;
mod validator;

use thiserror::Error;

use crate::store::StoreError;

pub use config_flow::ConfigFlow;
pub use entity_form::validate_entity;
pub use options_flow::OptionsFlow;
pub use result::{BASE_ERROR_KEY, FlowResult, FlowResultType, FormErrors, StepId};
pub use state::{FlowContext, FlowEvent, FlowState, StepOutput, transition};
pub use validator::{ProbeHandle, ResourceValidator, ValidationError, check_connection};

/// Misuse of a flow, as opposed to invalid form input
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlowError {
    #[error("Flow has already finished")]
    AlreadyFinished,

    #[error("Step '{step}' does not accept {input} input")]
    UnexpectedInput {
        step: &'static str,
        input: &'static str,
    },

    #[error("Entry not found: {0}")]
    UnknownEntry(String),

    #[error("Entry has no sensor at position {0}")]
    UnknownEntity(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}
