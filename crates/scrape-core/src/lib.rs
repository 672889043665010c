//! Scrape Flow Core Library
//!
//! This crate provides the setup and options flows for scrape sensors:
//! a resource is probed over HTTP, a CSS selector is attached to it, and the
//! resulting configuration is handed to an entry store. A small runtime renders
//! the configured sensors from the stored configuration.

pub mod config;
pub mod error;
pub mod fetch;
pub mod flow;
pub mod model;
pub mod sensor;
pub mod store;

// Re-export commonly used types
pub use config::{AppConfig, LoggingConfig};
pub use error::{ScrapeFlowError, ScrapeResult};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use flow::{
    ConfigFlow, FlowError, FlowResult, FlowResultType, OptionsFlow, ProbeHandle,
    ResourceValidator, StepId, ValidationError,
};
pub use model::{
    ConfigEntry, Configuration, ConnectionParameters, EntityDefinition, EntityInput, HttpMethod,
};
pub use sensor::{ScrapeError, ScrapeSensor, SensorRuntime, SensorState};
pub use store::{EntryHandle, EntryStore, InMemoryEntryStore, JsonFileEntryStore, StoreError};
