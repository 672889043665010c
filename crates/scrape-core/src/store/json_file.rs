//! Entry store persisted to a JSON file

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{EntryHandle, EntryStore, StoreError, remove_from, replace_in};
use crate::config::defaults::ENTRY_VERSION;
use crate::model::{ConfigEntry, Configuration};

#[derive(Debug, Serialize, Deserialize)]
struct EntriesFile {
    version: u32,
    #[serde(default)]
    entries: Vec<ConfigEntry>,
}

/// Entries loaded from and written back to one JSON file
///
/// Every mutation writes the complete file to a temporary sibling and renames
/// it over the original before the in-memory copy is updated.
#[derive(Debug)]
pub struct JsonFileEntryStore {
    path: PathBuf,
    entries: RwLock<Vec<ConfigEntry>>,
}

impl JsonFileEntryStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let file: EntriesFile = serde_json::from_str(&content)?;
            debug!("Loaded {} entries from {}", file.entries.len(), path.display());
            file.entries
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &[ConfigEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = EntriesFile {
            version: ENTRY_VERSION,
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Run a mutation against a copy and commit it only if the file write succeeds
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<ConfigEntry>) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut guard = self.entries.write();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }
}

impl EntryStore for JsonFileEntryStore {
    fn create_entry(&self, title: &str, options: Configuration) -> Result<ConfigEntry, StoreError> {
        let entry = ConfigEntry::new(Uuid::new_v4().to_string(), title, options);
        let created = self.mutate(|entries| {
            entries.push(entry.clone());
            Ok(entry)
        })?;
        info!(entry_id = %created.entry_id, path = %self.path.display(), "Created entry");
        Ok(created)
    }

    fn replace_options(&self, entry: &EntryHandle, options: Configuration) -> Result<ConfigEntry, StoreError> {
        let updated = self.mutate(|entries| replace_in(entries, entry, options))?;
        info!(entry_id = %entry, path = %self.path.display(), "Replaced entry options");
        Ok(updated)
    }

    fn remove_entry(&self, entry: &EntryHandle) -> Result<ConfigEntry, StoreError> {
        let removed = self.mutate(|entries| remove_from(entries, entry))?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionParameters, EntityDefinition};
    use tempfile::TempDir;

    fn config(select: &str) -> Configuration {
        Configuration::new(
            ConnectionParameters::new("https://example.org").with_credentials("user", "pass"),
            vec![EntityDefinition::new("Title", select, 0)],
        )
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileEntryStore::open(dir.path().join("entries.json")).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("entries.json");

        let store = JsonFileEntryStore::open(&path).unwrap();
        let entry = store.create_entry("https://example.org", config("h1")).unwrap();
        store
            .replace_options(&EntryHandle::from(&entry), config("h2"))
            .unwrap();

        let reopened = JsonFileEntryStore::open(&path).unwrap();
        let entries = reopened.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_id, entry.entry_id);
        assert_eq!(entries[0].options, config("h2"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_failed_replace_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entries.json");
        let store = JsonFileEntryStore::open(&path).unwrap();
        store.create_entry("https://example.org", config("h1")).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let err = store
            .replace_options(&EntryHandle::new("missing"), config("h2"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entries.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileEntryStore::open(&path).unwrap_err(),
            StoreError::Json(_)
        ));
    }
}
