//! Options flow: reconfigures an existing entry in place

use std::sync::Arc;

use tracing::info;

use super::FlowError;
use super::engine::FlowEngine;
use super::result::{FlowResult, StepId};
use super::state::{FlowContext, FlowState, StepOutput};
use super::validator::{ProbeHandle, ResourceValidator};
use crate::model::{ConfigEntry, ConnectionParameters, EntityInput};
use crate::store::{EntryHandle, EntryStore};

/// Re-validates the connection of an entry and replaces one of its sensors
///
/// The finished configuration replaces the stored one wholesale; the sensor
/// being edited keeps its position, so the sensor count never grows.
pub struct OptionsFlow {
    engine: FlowEngine,
    store: Arc<dyn EntryStore>,
    entry: ConfigEntry,
    slot: usize,
}

impl OptionsFlow {
    /// Open an options flow for `entry`, editing its first sensor
    pub fn new(validator: ResourceValidator, store: Arc<dyn EntryStore>, entry: &EntryHandle) -> Result<Self, FlowError> {
        Self::for_sensor(validator, store, entry, 0)
    }

    /// Open an options flow for `entry`, editing the sensor at `slot`
    pub fn for_sensor(
        validator: ResourceValidator,
        store: Arc<dyn EntryStore>,
        entry: &EntryHandle,
        slot: usize,
    ) -> Result<Self, FlowError> {
        let current = store
            .get(entry)
            .ok_or_else(|| FlowError::UnknownEntry(entry.to_string()))?;

        let count = current.options.entities.len();
        if slot >= count && !(slot == 0 && count == 0) {
            return Err(FlowError::UnknownEntity(slot));
        }

        let context = FlowContext::options(current.options.entities.clone(), slot);
        Ok(Self {
            engine: FlowEngine::new(validator, context),
            store,
            entry: current,
            slot,
        })
    }

    pub fn flow_id(&self) -> &str {
        self.engine.flow_id()
    }

    pub fn state(&self) -> &FlowState {
        self.engine.state()
    }

    pub fn current_step(&self) -> Option<StepId> {
        self.engine.state().step_id(self.engine.context())
    }

    pub fn probe(&self) -> Option<&ProbeHandle> {
        self.engine.probe()
    }

    /// The entry as it was when the flow opened
    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    /// Prefill for the connection form
    pub fn connection_defaults(&self) -> &ConnectionParameters {
        &self.entry.options.connection
    }

    /// Prefill for the sensor form
    pub fn entity_defaults(&self) -> Option<EntityInput> {
        self.entry.options.entities.get(self.slot).map(EntityInput::from)
    }

    /// Show the connection form
    pub fn start(&mut self) -> Result<FlowResult, FlowError> {
        let output = self.engine.begin()?;
        self.finish_step(output)
    }

    /// Submit the connection step
    pub async fn submit_connection(&mut self, params: ConnectionParameters) -> Result<FlowResult, FlowError> {
        let output = self.engine.submit_connection(params).await?;
        self.finish_step(output)
    }

    /// Submit the sensor step; on success the entry options are replaced
    ///
    /// The other sensors are read from the store again first, so changes made
    /// to the entry since the flow opened are kept.
    pub fn submit_entity(&mut self, input: EntityInput) -> Result<FlowResult, FlowError> {
        if !self.state().is_done() {
            let handle = EntryHandle::from(&self.entry);
            let current = self
                .store
                .get(&handle)
                .ok_or_else(|| FlowError::UnknownEntry(handle.to_string()))?;
            self.engine.set_existing(current.options.entities.clone());
            self.entry = current;
        }
        let output = self.engine.submit_entity(input)?;
        self.finish_step(output)
    }

    fn finish_step(&self, output: StepOutput) -> Result<FlowResult, FlowError> {
        match output {
            StepOutput::Form { step_id, errors } => {
                Ok(FlowResult::form(self.flow_id(), step_id, errors))
            }
            StepOutput::Complete { options, .. } => {
                let handle = EntryHandle::from(&self.entry);
                let entry = self.store.replace_options(&handle, options)?;
                info!(flow_id = %self.flow_id(), entry_id = %entry.entry_id, "Options flow finished");
                Ok(FlowResult::create_entry(self.flow_id(), StepId::Sensor, entry))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, MockFetcher};
    use crate::model::{Configuration, EntityDefinition};
    use crate::store::InMemoryEntryStore;

    fn seeded_store() -> (Arc<InMemoryEntryStore>, EntryHandle) {
        let store = Arc::new(InMemoryEntryStore::new());
        let entry = store
            .create_entry(
                "https://example.org",
                Configuration::new(
                    ConnectionParameters::new("https://example.org"),
                    vec![EntityDefinition::new("Current version", ".current-version h1", 0)],
                ),
            )
            .unwrap();
        let handle = EntryHandle::from(&entry);
        (store, handle)
    }

    fn ok_fetcher(times: usize) -> MockFetcher {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .times(times)
            .returning(|_| Ok("<h1>ok</h1>".to_string()));
        fetcher
    }

    #[tokio::test]
    async fn test_replaces_in_place() {
        let (store, handle) = seeded_store();
        let validator = ResourceValidator::new(Arc::new(ok_fetcher(1)));
        let mut flow = OptionsFlow::new(validator, store.clone(), &handle).unwrap();

        assert_eq!(flow.start().unwrap().step_id, StepId::Init);
        assert_eq!(
            flow.entity_defaults(),
            Some(EntityInput::new("Current version", ".current-version h1", 0))
        );

        let params = flow
            .connection_defaults()
            .clone()
            .with_credentials("secret_username", "secret_password");
        let result = flow.submit_connection(params.clone()).await.unwrap();
        assert_eq!(result.step_id, StepId::Sensor);

        let result = flow
            .submit_entity(EntityInput::new("Current version", ".hidden-version h1", 0))
            .unwrap();
        assert!(result.is_create_entry());
        assert_eq!(result.entry_id.as_deref(), Some(handle.as_str()));

        assert_eq!(store.len(), 1);
        let stored = store.get(&handle).unwrap();
        assert_eq!(stored.options.connection, params);
        assert_eq!(stored.options.entities.len(), 1);
        assert_eq!(stored.options.entities[0].select, ".hidden-version h1");
    }

    #[tokio::test]
    async fn test_failed_probe_keeps_entry() {
        let (store, handle) = seeded_store();
        let before = store.get(&handle).unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Err(FetchError::Timeout { seconds: 10.0 }));
        let validator = ResourceValidator::new(Arc::new(fetcher));
        let mut flow = OptionsFlow::new(validator, store.clone(), &handle).unwrap();

        flow.start().unwrap();
        let result = flow
            .submit_connection(ConnectionParameters::new("https://example.org"))
            .await
            .unwrap();
        assert_eq!(result.step_id, StepId::Init);
        assert_eq!(result.error("base"), Some("resource_error"));
        assert_eq!(store.get(&handle).unwrap(), before);
    }

    #[tokio::test]
    async fn test_keeps_sensors_added_while_open() {
        let (store, handle) = seeded_store();
        let validator = ResourceValidator::new(Arc::new(ok_fetcher(1)));
        let mut flow = OptionsFlow::new(validator, store.clone(), &handle).unwrap();

        flow.start().unwrap();
        flow.submit_connection(ConnectionParameters::new("https://example.org"))
            .await
            .unwrap();

        let mut changed = store.get(&handle).unwrap().options;
        changed
            .entities
            .push(EntityDefinition::new("Release date", ".release-date", 0));
        store.replace_options(&handle, changed).unwrap();

        let result = flow
            .submit_entity(EntityInput::new("Release date", ".hidden-version h1", 0))
            .unwrap();
        assert_eq!(result.error("name"), Some("name_exists"));

        let result = flow
            .submit_entity(EntityInput::new("Current version", ".hidden-version h1", 0))
            .unwrap();
        assert!(result.is_create_entry());

        let stored = store.get(&handle).unwrap();
        assert_eq!(stored.options.entities.len(), 2);
        assert_eq!(stored.options.entities[0].select, ".hidden-version h1");
        assert_eq!(stored.options.entities[1].name, "Release date");
    }

    #[tokio::test]
    async fn test_entry_removed_while_open() {
        let (store, handle) = seeded_store();
        let validator = ResourceValidator::new(Arc::new(ok_fetcher(1)));
        let mut flow = OptionsFlow::new(validator, store.clone(), &handle).unwrap();

        flow.start().unwrap();
        flow.submit_connection(ConnectionParameters::new("https://example.org"))
            .await
            .unwrap();
        store.remove_entry(&handle).unwrap();

        let err = flow
            .submit_entity(EntityInput::new("Current version", "h1", 0))
            .unwrap_err();
        assert_eq!(err, FlowError::UnknownEntry(handle.to_string()));
    }

    #[test]
    fn test_unknown_entry() {
        let store = Arc::new(InMemoryEntryStore::new());
        let validator = ResourceValidator::new(Arc::new(MockFetcher::new()));
        let err = OptionsFlow::new(validator, store, &EntryHandle::new("nope"))
            .err()
            .unwrap();
        assert_eq!(err, FlowError::UnknownEntry("nope".to_string()));
    }

    #[test]
    fn test_unknown_sensor_slot() {
        let (store, handle) = seeded_store();
        let validator = ResourceValidator::new(Arc::new(MockFetcher::new()));
        let err = OptionsFlow::for_sensor(validator, store, &handle, 3)
            .err()
            .unwrap();
        assert_eq!(err, FlowError::UnknownEntity(3));
    }
}
