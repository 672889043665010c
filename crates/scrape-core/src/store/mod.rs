//! Entry storage
//!
//! The flows hand finished configurations to an [`EntryStore`]. Replacing the
//! options of an entry swaps the whole configuration under one write lock, so
//! readers see either the old configuration or the new one.

mod json_file;
mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ConfigEntry, Configuration};

pub use json_file::JsonFileEntryStore;
pub use memory::InMemoryEntryStore;

/// Entry store error types
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Json(String),
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

/// Identity of a stored entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryHandle(String);

impl EntryHandle {
    pub fn new(entry_id: impl Into<String>) -> Self {
        Self(entry_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&ConfigEntry> for EntryHandle {
    fn from(entry: &ConfigEntry) -> Self {
        Self(entry.entry_id.clone())
    }
}

/// Persisted configuration entries
pub trait EntryStore: Send + Sync {
    /// Store a new entry and return it with its assigned id
    fn create_entry(&self, title: &str, options: Configuration) -> Result<ConfigEntry, StoreError>;

    /// Replace the whole configuration of an entry
    fn replace_options(&self, entry: &EntryHandle, options: Configuration) -> Result<ConfigEntry, StoreError>;

    /// Delete an entry
    fn remove_entry(&self, entry: &EntryHandle) -> Result<ConfigEntry, StoreError>;

    fn get(&self, entry: &EntryHandle) -> Option<ConfigEntry>;

    /// All entries in creation order
    fn entries(&self) -> Vec<ConfigEntry>;
}

/// Apply a replacement to an entry list, returning the updated entry
fn replace_in(entries: &mut [ConfigEntry], entry: &EntryHandle, options: Configuration) -> Result<ConfigEntry, StoreError> {
    let slot = entries
        .iter_mut()
        .find(|e| e.entry_id == entry.as_str())
        .ok_or_else(|| StoreError::NotFound(entry.to_string()))?;
    slot.options = options;
    Ok(slot.clone())
}

/// Remove an entry from a list, returning it
fn remove_from(entries: &mut Vec<ConfigEntry>, entry: &EntryHandle) -> Result<ConfigEntry, StoreError> {
    let position = entries
        .iter()
        .position(|e| e.entry_id == entry.as_str())
        .ok_or_else(|| StoreError::NotFound(entry.to_string()))?;
    Ok(entries.remove(position))
}
