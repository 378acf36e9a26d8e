use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::constants::is_in_progress;
use crate::debounce::{DebounceGuard, MutationKind};
use crate::errors::{Error, Result, ValidationError};
use crate::events::{ChangeEvent, ChangeEventSink, NoOpChangeEventSink};
use crate::registrations::{
    NewRegistration, Registration, RegistrationRepositoryTrait, RegistrationServiceTrait,
};
use crate::settings::SettingsServiceTrait;

/// Applies validated mutations to the store and publishes one change
/// event per confirmed mutation.
///
/// Requests that the debounce guard flags as duplicates are still written
/// (the store is the single writer and last write wins) but produce no
/// event; callers see a normal success response either way.
pub struct RegistrationService {
    repository: Arc<dyn RegistrationRepositoryTrait>,
    settings: Arc<dyn SettingsServiceTrait>,
    debounce: Arc<DebounceGuard>,
    sink: Arc<dyn ChangeEventSink>,
}

impl RegistrationService {
    pub fn new(
        repository: Arc<dyn RegistrationRepositoryTrait>,
        settings: Arc<dyn SettingsServiceTrait>,
        debounce: Arc<DebounceGuard>,
    ) -> Self {
        Self {
            repository,
            settings,
            debounce,
            sink: Arc::new(NoOpChangeEventSink),
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn ChangeEventSink>) -> Self {
        self.sink = sink;
        self
    }

    fn require_field(value: &str, field: &str) -> Result<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                field.to_string(),
            )));
        }
        Ok(trimmed.to_string())
    }

    async fn validate_status(&self, status: &str) -> Result<()> {
        let vocabulary = self.settings.status_vocabulary().await?;
        if vocabulary.iter().any(|option| option.value == status) {
            Ok(())
        } else {
            Err(Error::Validation(ValidationError::UnknownStatus(
                status.to_string(),
            )))
        }
    }
}

#[async_trait]
impl RegistrationServiceTrait for RegistrationService {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Registration>> {
        self.repository.list(category).await
    }

    async fn create(&self, new_registration: NewRegistration) -> Result<Registration> {
        let new_registration = NewRegistration {
            student_name: Self::require_field(&new_registration.student_name, "studentName")?,
            phone_number: Self::require_field(&new_registration.phone_number, "phoneNumber")?,
            programme: Self::require_field(&new_registration.programme, "programme")?,
            category: new_registration
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };

        let created = self.repository.create(new_registration).await?;
        self.sink.emit(ChangeEvent::Created {
            registration: created.clone(),
        });
        Ok(created)
    }

    async fn set_status(&self, registration_id: i64, status: &str) -> Result<Registration> {
        self.validate_status(status).await?;

        let entity = registration_id.to_string();
        let fresh = self.debounce.accept(MutationKind::SetStatus, &entity);
        let updated = self
            .repository
            .update_status(registration_id, status, is_in_progress(status))
            .await
            .inspect_err(|_| {
                if fresh {
                    // Nothing was applied; the retry is not a duplicate.
                    self.debounce.forget(MutationKind::SetStatus, &entity);
                }
            })?;
        if fresh {
            self.sink.emit(ChangeEvent::Updated {
                registration: updated.clone(),
            });
        } else {
            debug!("Suppressed duplicate status broadcast for {registration_id}");
        }
        Ok(updated)
    }

    async fn set_remark(&self, registration_id: i64, remark: &str) -> Result<Registration> {
        let entity = registration_id.to_string();
        let fresh = self.debounce.accept(MutationKind::SetRemark, &entity);
        let updated = self
            .repository
            .update_remark(registration_id, remark)
            .await
            .inspect_err(|_| {
                if fresh {
                    self.debounce.forget(MutationKind::SetRemark, &entity);
                }
            })?;
        if fresh {
            self.sink.emit(ChangeEvent::Updated {
                registration: updated.clone(),
            });
        } else {
            debug!("Suppressed duplicate remark broadcast for {registration_id}");
        }
        Ok(updated)
    }

    async fn delete(&self, registration_id: i64) -> Result<()> {
        // Deleting an absent id is success with no event, so deletes stay
        // safely retryable.
        let Some(existing) = self.repository.get(registration_id).await? else {
            return Ok(());
        };

        let entity = registration_id.to_string();
        let fresh = self.debounce.accept(MutationKind::Delete, &entity);
        let removed = self
            .repository
            .delete(registration_id)
            .await
            .inspect_err(|_| {
                if fresh {
                    self.debounce.forget(MutationKind::Delete, &entity);
                }
            })?;
        if removed > 0 && fresh {
            self.sink.emit(ChangeEvent::Deleted {
                id: registration_id,
                category: existing.category,
            });
        }
        Ok(())
    }

    async fn clear(&self, category: Option<&str>) -> Result<()> {
        let scope = category.unwrap_or_default();
        let fresh = self.debounce.accept(MutationKind::Clear, scope);
        self.repository.clear_all(category).await.inspect_err(|_| {
            if fresh {
                self.debounce.forget(MutationKind::Clear, scope);
            }
        })?;
        if fresh {
            self.sink.emit(ChangeEvent::Cleared {
                category: category.map(str::to_string),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingChangeEventSink;
    use crate::settings::{default_status_vocabulary, SettingKey, SettingValue, SettingsMap};
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory registration store mirroring the repository contract.
    #[derive(Default)]
    struct MemoryRegistrationRepository {
        rows: Mutex<Vec<Registration>>,
        next_id: Mutex<i64>,
    }

    #[async_trait]
    impl RegistrationRepositoryTrait for MemoryRegistrationRepository {
        async fn list(&self, category: Option<&str>) -> Result<Vec<Registration>> {
            let rows = self.rows.lock().unwrap();
            let mut out: Vec<Registration> = rows
                .iter()
                .filter(|r| category.is_none() || r.category.as_deref() == category)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            Ok(out)
        }

        async fn get(&self, registration_id: i64) -> Result<Option<Registration>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == registration_id)
                .cloned())
        }

        async fn create(&self, new_registration: NewRegistration) -> Result<Registration> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let now = Utc::now();
            let registration = Registration {
                id: *next_id,
                student_name: new_registration.student_name,
                phone_number: new_registration.phone_number,
                programme: new_registration.programme,
                category: new_registration.category,
                status: crate::constants::DEFAULT_STATUS.to_string(),
                remark: String::new(),
                timestamp: now,
                time_in: None,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(registration.clone());
            Ok(registration)
        }

        async fn update_status(
            &self,
            registration_id: i64,
            status: &str,
            enters_progress: bool,
        ) -> Result<Registration> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id == registration_id)
                .ok_or_else(|| Error::NotFound(registration_id.to_string()))?;
            row.status = status.to_string();
            if enters_progress && row.time_in.is_none() {
                row.time_in = Some(Utc::now());
            }
            row.updated_at = Utc::now();
            Ok(row.clone())
        }

        async fn update_remark(
            &self,
            registration_id: i64,
            remark: &str,
        ) -> Result<Registration> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|r| r.id == registration_id)
                .ok_or_else(|| Error::NotFound(registration_id.to_string()))?;
            row.remark = remark.to_string();
            row.updated_at = Utc::now();
            Ok(row.clone())
        }

        async fn delete(&self, registration_id: i64) -> Result<usize> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| r.id != registration_id);
            Ok(before - rows.len())
        }

        async fn clear_all(&self, category: Option<&str>) -> Result<()> {
            let mut rows = self.rows.lock().unwrap();
            match category {
                Some(c) => rows.retain(|r| r.category.as_deref() != Some(c)),
                None => {
                    rows.clear();
                    *self.next_id.lock().unwrap() = 0;
                }
            }
            Ok(())
        }
    }

    /// Settings stub returning the default vocabulary.
    struct StaticSettings;

    #[async_trait]
    impl SettingsServiceTrait for StaticSettings {
        async fn get_all(&self) -> Result<SettingsMap> {
            Ok(SettingsMap::new())
        }

        async fn get(&self, _key: &SettingKey) -> Result<Option<SettingValue>> {
            Ok(None)
        }

        async fn update(&self, _key: SettingKey, _value: SettingValue) -> Result<()> {
            Ok(())
        }

        async fn max_capacity(&self) -> Result<u32> {
            Ok(50)
        }

        async fn status_vocabulary(&self) -> Result<Vec<crate::settings::StatusOption>> {
            Ok(default_status_vocabulary())
        }

        async fn seed_defaults(&self) -> Result<()> {
            Ok(())
        }
    }

    fn service_with(
        window: Duration,
    ) -> (
        RegistrationService,
        Arc<MemoryRegistrationRepository>,
        Arc<CollectingChangeEventSink>,
    ) {
        let repository = Arc::new(MemoryRegistrationRepository::default());
        let sink = Arc::new(CollectingChangeEventSink::new());
        let service = RegistrationService::new(
            repository.clone(),
            Arc::new(StaticSettings),
            Arc::new(DebounceGuard::new(window)),
        )
        .with_event_sink(sink.clone());
        (service, repository, sink)
    }

    fn sample() -> NewRegistration {
        NewRegistration {
            student_name: "Alice".into(),
            phone_number: "012345".into(),
            programme: "CS".into(),
            category: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_defaults_and_broadcasts() {
        let (service, _, sink) = service_with(Duration::ZERO);
        let created = service.create(sample()).await.unwrap();
        assert_eq!(created.status, "registered");
        assert_eq!(created.remark, "");
        assert!(created.time_in.is_none());

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ChangeEvent::Created { registration } => assert_eq!(registration.id, created.id),
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_fields() {
        let (service, _, sink) = service_with(Duration::ZERO);
        let mut input = sample();
        input.phone_number = "   ".into();
        let err = service.create(input).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingField(ref f)) if f == "phoneNumber"
        ));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn unknown_status_is_rejected_without_mutation_or_event() {
        let (service, repository, sink) = service_with(Duration::ZERO);
        let created = service.create(sample()).await.unwrap();
        sink.clear();

        let err = service.set_status(created.id, "teleported").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnknownStatus(_))
        ));
        assert!(sink.is_empty());
        let stored = repository.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "registered");
    }

    #[tokio::test]
    async fn time_in_is_stamped_once() {
        let (service, _, _) = service_with(Duration::ZERO);
        let created = service.create(sample()).await.unwrap();

        let first = service.set_status(created.id, "inside").await.unwrap();
        let stamped = first.time_in.expect("time_in stamped on first entry");

        service.set_status(created.id, "waiting").await.unwrap();
        let again = service.set_status(created.id, "inside").await.unwrap();
        assert_eq!(again.time_in, Some(stamped));
    }

    #[tokio::test]
    async fn debounced_status_applies_latest_but_emits_once() {
        let (service, repository, sink) = service_with(Duration::from_secs(60));
        let created = service.create(sample()).await.unwrap();
        sink.clear();

        service.set_status(created.id, "waiting").await.unwrap();
        service.set_status(created.id, "urgent").await.unwrap();

        // Exactly one broadcast; the store holds the latest value.
        assert_eq!(sink.len(), 1);
        let stored = repository.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, "urgent");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (service, _, sink) = service_with(Duration::ZERO);
        let created = service.create(sample()).await.unwrap();
        sink.clear();

        service.delete(created.id).await.unwrap();
        assert_eq!(sink.len(), 1);

        // Second delete: success, no event.
        service.delete(created.id).await.unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[tokio::test]
    async fn clear_scopes_by_category() {
        let (service, repository, sink) = service_with(Duration::ZERO);
        let mut science = sample();
        science.category = Some("science".into());
        let mut business = sample();
        business.student_name = "Bob".into();
        business.category = Some("business".into());
        service.create(science).await.unwrap();
        service.create(business).await.unwrap();
        sink.clear();

        service.clear(Some("science")).await.unwrap();

        let remaining = repository.list(None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].category.as_deref(), Some("business"));
        assert_eq!(
            sink.events(),
            vec![ChangeEvent::Cleared {
                category: Some("science".into())
            }]
        );
    }
}
