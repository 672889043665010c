//! Data model shared by the flows, the store and the sensor runtime

mod configuration;
mod connection;
mod entity;

pub use configuration::{ConfigEntry, Configuration};
pub use connection::{ConnectionParameters, HttpMethod};
pub use entity::{EntityDefinition, EntityInput};
