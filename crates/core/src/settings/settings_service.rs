use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::constants::DEFAULT_MAX_CAPACITY;
use crate::errors::Result;
use crate::events::{ChangeEvent, ChangeEventSink, NoOpChangeEventSink};
use crate::settings::settings_model::default_settings;
use crate::settings::{
    default_status_vocabulary, SettingKey, SettingValue, SettingsMap, SettingsRepositoryTrait,
    StatusOption,
};

/// Service trait for settings reads and mutations.
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    async fn get_all(&self) -> Result<SettingsMap>;

    async fn get(&self, key: &SettingKey) -> Result<Option<SettingValue>>;

    /// Persist a setting and broadcast the change. Last write wins on
    /// concurrent updates to the same key.
    async fn update(&self, key: SettingKey, value: SettingValue) -> Result<()>;

    /// Configured maximum capacity, falling back to the default.
    async fn max_capacity(&self) -> Result<u32>;

    /// Configured status vocabulary, falling back to the default.
    async fn status_vocabulary(&self) -> Result<Vec<StatusOption>>;

    /// Write the default settings for any key never written. Runs on boot;
    /// emits no events.
    async fn seed_defaults(&self) -> Result<()>;
}

pub struct SettingsService {
    repository: Arc<dyn SettingsRepositoryTrait>,
    sink: Arc<dyn ChangeEventSink>,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        Self {
            repository,
            sink: Arc::new(NoOpChangeEventSink),
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn ChangeEventSink>) -> Self {
        self.sink = sink;
        self
    }
}

#[async_trait]
impl SettingsServiceTrait for SettingsService {
    async fn get_all(&self) -> Result<SettingsMap> {
        self.repository.get_all_settings().await
    }

    async fn get(&self, key: &SettingKey) -> Result<Option<SettingValue>> {
        self.repository.get_setting(key).await
    }

    async fn update(&self, key: SettingKey, value: SettingValue) -> Result<()> {
        self.repository.set_setting(&key, &value).await?;
        debug!("Setting '{}' updated", key.storage_key());
        self.sink.emit(ChangeEvent::SettingChanged {
            key: key.storage_key(),
            value,
        });
        Ok(())
    }

    async fn max_capacity(&self) -> Result<u32> {
        Ok(self
            .repository
            .get_setting(&SettingKey::MaxCapacity)
            .await?
            .and_then(|v| v.as_integer())
            .unwrap_or(DEFAULT_MAX_CAPACITY))
    }

    async fn status_vocabulary(&self) -> Result<Vec<StatusOption>> {
        Ok(self
            .repository
            .get_setting(&SettingKey::Statuses)
            .await?
            .and_then(|v| match v {
                SettingValue::Statuses(options) => Some(options),
                _ => None,
            })
            .unwrap_or_else(default_status_vocabulary))
    }

    async fn seed_defaults(&self) -> Result<()> {
        for (key, value) in default_settings() {
            if self.repository.get_setting(&key).await?.is_none() {
                info!("Seeding default setting '{}'", key.storage_key());
                self.repository.set_setting(&key, &value).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingChangeEventSink;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory settings store for service tests.
    #[derive(Default)]
    struct MemorySettingsRepository {
        rows: Mutex<BTreeMap<String, SettingValue>>,
    }

    #[async_trait]
    impl SettingsRepositoryTrait for MemorySettingsRepository {
        async fn get_setting(&self, key: &SettingKey) -> Result<Option<SettingValue>> {
            Ok(self.rows.lock().unwrap().get(&key.storage_key()).cloned())
        }

        async fn set_setting(&self, key: &SettingKey, value: &SettingValue) -> Result<()> {
            self.rows
                .lock()
                .unwrap()
                .insert(key.storage_key(), value.clone());
            Ok(())
        }

        async fn get_all_settings(&self) -> Result<SettingsMap> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn update_persists_and_broadcasts() {
        let sink = Arc::new(CollectingChangeEventSink::new());
        let service = SettingsService::new(Arc::new(MemorySettingsRepository::default()))
            .with_event_sink(sink.clone());

        service
            .update(
                SettingKey::EventName(Some("science".into())),
                SettingValue::Text("Science Fair".into()),
            )
            .await
            .unwrap();

        let stored = service
            .get(&SettingKey::EventName(Some("science".into())))
            .await
            .unwrap();
        assert_eq!(stored, Some(SettingValue::Text("Science Fair".into())));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            ChangeEvent::SettingChanged {
                key: "event_name_science".into(),
                value: SettingValue::Text("Science Fair".into()),
            }
        );
    }

    #[tokio::test]
    async fn seeding_fills_gaps_without_events() {
        let sink = Arc::new(CollectingChangeEventSink::new());
        let repository = Arc::new(MemorySettingsRepository::default());
        let service = SettingsService::new(repository.clone()).with_event_sink(sink.clone());

        // Operator already customized the capacity; seeding must not touch it.
        repository
            .set_setting(&SettingKey::MaxCapacity, &SettingValue::Integer(10))
            .await
            .unwrap();

        service.seed_defaults().await.unwrap();

        assert_eq!(service.max_capacity().await.unwrap(), 10);
        assert!(!service.status_vocabulary().await.unwrap().is_empty());
        assert!(sink.is_empty());

        // Seeding twice changes nothing.
        service.seed_defaults().await.unwrap();
        assert_eq!(service.max_capacity().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn fallbacks_apply_when_unset() {
        let service = SettingsService::new(Arc::new(MemorySettingsRepository::default()));
        assert_eq!(service.max_capacity().await.unwrap(), DEFAULT_MAX_CAPACITY);
        let vocabulary = service.status_vocabulary().await.unwrap();
        assert!(vocabulary.iter().any(|s| s.value == "registered"));
    }
}
