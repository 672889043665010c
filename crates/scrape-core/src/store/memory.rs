//! In-memory entry store

use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{EntryHandle, EntryStore, StoreError, remove_from, replace_in};
use crate::model::{ConfigEntry, Configuration};

/// Entries kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryEntryStore {
    entries: RwLock<Vec<ConfigEntry>>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing entries
    pub fn with_entries(entries: Vec<ConfigEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl EntryStore for InMemoryEntryStore {
    fn create_entry(&self, title: &str, options: Configuration) -> Result<ConfigEntry, StoreError> {
        let entry = ConfigEntry::new(Uuid::new_v4().to_string(), title, options);
        self.entries.write().push(entry.clone());
        info!(entry_id = %entry.entry_id, title, "Created entry");
        Ok(entry)
    }

    fn replace_options(&self, entry: &EntryHandle, options: Configuration) -> Result<ConfigEntry, StoreError> {
        let updated = replace_in(&mut self.entries.write(), entry, options)?;
        info!(entry_id = %entry, "Replaced entry options");
        Ok(updated)
    }

    fn remove_entry(&self, entry: &EntryHandle) -> Result<ConfigEntry, StoreError> {
        let removed = remove_from(&mut self.entries.write(), entry)?;
        info!(entry_id = %entry, "Removed entry");
        Ok(removed)
    }

    fn get(&self, entry: &EntryHandle) -> Option<ConfigEntry> {
        self.entries
            .read()
            .iter()
            .find(|e| e.entry_id == entry.as_str())
            .cloned()
    }

    fn entries(&self) -> Vec<ConfigEntry> {
        self.entries.read().clone()
    }
}
