//! Scrape sensor setup flows
//!
//! Facade over [`scrape_core`]: the setup flow, the options flow, the entry
//! stores and the sensor runtime.

pub use scrape_core::*;

/// Commonly used types for driving the flows
pub mod prelude {
    pub use scrape_core::{
        ConfigEntry, ConfigFlow, Configuration, ConnectionParameters, EntityDefinition,
        EntityInput, EntryHandle, EntryStore, FlowResult, HttpFetcher, HttpMethod,
        InMemoryEntryStore, OptionsFlow, ResourceValidator, SensorRuntime, StepId,
    };
}
