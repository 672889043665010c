//! Renders sensor states from the stored configuration

use std::collections::HashSet;
use std::sync::Arc;

use scraper::Html;
use tracing::{debug, warn};

use super::{ScrapeError, ScrapeSensor, SensorState};
use crate::error::ScrapeResult;
use crate::fetch::Fetcher;
use crate::model::ConfigEntry;
use crate::store::{EntryHandle, EntryStore, StoreError};

/// Fetches each entry's resource and renders its sensors
///
/// Nothing is cached between refreshes: every refresh reads the entry from
/// the store, so a replaced configuration shows up on the next refresh.
pub struct SensorRuntime {
    store: Arc<dyn EntryStore>,
    fetcher: Arc<dyn Fetcher>,
}

impl SensorRuntime {
    pub fn new(store: Arc<dyn EntryStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { store, fetcher }
    }

    /// Sensors of every entry, in store order
    ///
    /// Entity ids are unique across entries; later duplicates get a numeric suffix.
    pub fn sensors(entries: &[ConfigEntry]) -> Vec<Vec<ScrapeSensor>> {
        let mut seen = HashSet::new();
        entries
            .iter()
            .map(|entry| {
                entry
                    .options
                    .entities
                    .iter()
                    .cloned()
                    .map(|def| {
                        let mut sensor = ScrapeSensor::from_definition(entry.entry_id.clone(), def);
                        if !seen.insert(sensor.entity_id.clone()) {
                            let base = sensor.entity_id.clone();
                            let mut n = 2;
                            while seen.contains(&format!("{}_{}", base, n)) {
                                n += 1;
                            }
                            sensor.entity_id = format!("{}_{}", base, n);
                            seen.insert(sensor.entity_id.clone());
                        }
                        sensor
                    })
                    .collect()
            })
            .collect()
    }

    /// Fetch one entry's resource and render all of its sensors
    pub async fn refresh(&self, entry: &EntryHandle) -> ScrapeResult<Vec<SensorState>> {
        let entries = self.store.entries();
        let position = entries
            .iter()
            .position(|e| e.entry_id == entry.as_str())
            .ok_or_else(|| StoreError::NotFound(entry.to_string()))?;
        let sensors = Self::sensors(&entries).swap_remove(position);
        Ok(self.refresh_entry(&entries[position], &sensors).await)
    }

    async fn refresh_entry(&self, entry: &ConfigEntry, sensors: &[ScrapeSensor]) -> Vec<SensorState> {
        debug!(entry_id = %entry.entry_id, sensors = sensors.len(), "Refreshing entry");

        match self.fetcher.fetch(&entry.options.connection).await {
            Ok(document) => render_all(sensors, &document),
            Err(e) => {
                warn!(entry_id = %entry.entry_id, error = %e, "Failed to fetch resource");
                let error = ScrapeError::Fetch(e.to_string());
                sensors
                    .iter()
                    .map(|sensor| sensor.state(None, Some(error.clone())))
                    .collect()
            }
        }
    }

    /// Render every sensor of every entry
    pub async fn states(&self) -> Vec<SensorState> {
        let entries = self.store.entries();
        let mut states = Vec::new();
        for (entry, sensors) in entries.iter().zip(Self::sensors(&entries)) {
            states.extend(self.refresh_entry(entry, &sensors).await);
        }
        states
    }

    /// Render a single sensor by entity id
    pub async fn state(&self, entity_id: &str) -> Option<SensorState> {
        self.states()
            .await
            .into_iter()
            .find(|s| s.entity_id == entity_id)
    }
}

fn render_all(sensors: &[ScrapeSensor], document: &str) -> Vec<SensorState> {
    let html = Html::parse_document(document);
    sensors.iter().map(|sensor| sensor.render(&html)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, MockFetcher};
    use crate::model::{Configuration, ConnectionParameters, EntityDefinition};
    use crate::store::InMemoryEntryStore;

    const PAGE: &str = "<div class=\"current-version\"><h1>Current Version: 2021.12.10</h1></div>";

    fn store_with(names: &[&str]) -> Arc<InMemoryEntryStore> {
        let store = Arc::new(InMemoryEntryStore::new());
        for name in names {
            store
                .create_entry(
                    "https://example.org",
                    Configuration::new(
                        ConnectionParameters::new("https://example.org"),
                        vec![EntityDefinition::new(*name, ".current-version h1", 0)],
                    ),
                )
                .unwrap();
        }
        store
    }

    fn page_fetcher() -> Arc<MockFetcher> {
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(|_| Ok(PAGE.to_string()));
        Arc::new(fetcher)
    }

    #[tokio::test]
    async fn test_refresh_renders_sensors() {
        let store = store_with(&["Current version"]);
        let handle = EntryHandle::from(&store.entries()[0]);
        let runtime = SensorRuntime::new(store, page_fetcher());

        let states = runtime.refresh(&handle).await.unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].entity_id, "sensor.current_version");
        assert_eq!(states[0].display_state(), "Current Version: 2021.12.10");
    }

    #[tokio::test]
    async fn test_refresh_unknown_entry() {
        let runtime = SensorRuntime::new(store_with(&[]), page_fetcher());
        assert!(runtime.refresh(&EntryHandle::new("missing")).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure_marks_unavailable() {
        let store = store_with(&["Current version"]);
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(FetchError::Request("refused".to_string())));
        let runtime = SensorRuntime::new(store, Arc::new(fetcher));

        let states = runtime.states().await;
        assert_eq!(states.len(), 1);
        assert!(!states[0].is_available());
        assert!(matches!(states[0].error, Some(ScrapeError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_duplicate_entity_ids_get_suffix() {
        let store = store_with(&["Version", "Version", "Version"]);
        let runtime = SensorRuntime::new(store, page_fetcher());

        let ids: Vec<_> = runtime
            .states()
            .await
            .into_iter()
            .map(|s| s.entity_id)
            .collect();
        assert_eq!(
            ids,
            vec!["sensor.version", "sensor.version_2", "sensor.version_3"]
        );
        assert!(runtime.state("sensor.version_2").await.is_some());
        assert!(runtime.state("sensor.other").await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_reports_same_ids_as_states() {
        let store = store_with(&["Version", "Version"]);
        let second = EntryHandle::from(&store.entries()[1]);
        let runtime = SensorRuntime::new(store, page_fetcher());

        let states = runtime.refresh(&second).await.unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].entity_id, "sensor.version_2");
        assert_eq!(states[0].entry_id, second.as_str());

        let all = runtime.states().await;
        assert_eq!(all[1].entity_id, states[0].entity_id);
    }
}
