use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use log::warn;

use super::model::AppSettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings::dsl::*;
use regdeck_core::errors::Result;
use regdeck_core::settings::{
    decode_setting, encode_setting, SettingKey, SettingValue, SettingsMap,
    SettingsRepositoryTrait,
};

/// Persists settings as plain strings; structured values cross this
/// boundary JSON-encoded and nowhere else.
pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    async fn get_setting(&self, key: &SettingKey) -> Result<Option<SettingValue>> {
        let mut conn = get_connection(&self.pool)?;
        let stored = app_settings
            .filter(setting_key.eq(key.storage_key()))
            .select(setting_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        match stored {
            Some(raw) => Ok(Some(decode_setting(key, &raw)?)),
            None => Ok(None),
        }
    }

    async fn set_setting(&self, key: &SettingKey, value: &SettingValue) -> Result<()> {
        let row = AppSettingDB {
            setting_key: key.storage_key(),
            setting_value: encode_setting(value),
        };
        self.writer
            .exec(move |conn| -> Result<()> {
                diesel::replace_into(app_settings)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn get_all_settings(&self) -> Result<SettingsMap> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(String, String)> = app_settings
            .select((setting_key, setting_value))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        let mut map = SettingsMap::new();
        for (raw_key, raw_value) in rows {
            let Ok(key) = SettingKey::parse(&raw_key) else {
                warn!("Skipping setting with unknown key '{raw_key}'");
                continue;
            };
            match decode_setting(&key, &raw_value) {
                Ok(value) => {
                    map.insert(raw_key, value);
                }
                Err(e) => {
                    warn!("Skipping undecodable setting '{raw_key}': {e}");
                }
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use regdeck_core::settings::default_status_vocabulary;

    async fn test_repository() -> (SettingsRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let path = db::init(path.to_str().unwrap()).unwrap();
        let pool = db::create_pool(&path).unwrap();
        db::run_migrations(&pool).unwrap();
        let writer = db::write_actor::spawn_writer((*pool).clone()).unwrap();
        (SettingsRepository::new(pool, writer), dir)
    }

    #[tokio::test]
    async fn unset_key_reads_as_none() {
        let (repo, _dir) = test_repository().await;
        let value = repo.get_setting(&SettingKey::MaxCapacity).await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn scalar_and_structured_values_round_trip() {
        let (repo, _dir) = test_repository().await;

        repo.set_setting(&SettingKey::MaxCapacity, &SettingValue::Integer(80))
            .await
            .unwrap();
        repo.set_setting(
            &SettingKey::Programmes(Some("science".into())),
            &SettingValue::List(vec!["CS".into(), "EE".into()]),
        )
        .await
        .unwrap();
        repo.set_setting(
            &SettingKey::Statuses,
            &SettingValue::Statuses(default_status_vocabulary()),
        )
        .await
        .unwrap();

        assert_eq!(
            repo.get_setting(&SettingKey::MaxCapacity).await.unwrap(),
            Some(SettingValue::Integer(80))
        );
        assert_eq!(
            repo.get_setting(&SettingKey::Programmes(Some("science".into())))
                .await
                .unwrap(),
            Some(SettingValue::List(vec!["CS".into(), "EE".into()]))
        );
        assert_eq!(
            repo.get_setting(&SettingKey::Statuses).await.unwrap(),
            Some(SettingValue::Statuses(default_status_vocabulary()))
        );
    }

    #[tokio::test]
    async fn set_setting_replaces_the_previous_value() {
        let (repo, _dir) = test_repository().await;
        repo.set_setting(
            &SettingKey::EventName(None),
            &SettingValue::Text("Autumn Fair".into()),
        )
        .await
        .unwrap();
        repo.set_setting(
            &SettingKey::EventName(None),
            &SettingValue::Text("Winter Fair".into()),
        )
        .await
        .unwrap();

        assert_eq!(
            repo.get_setting(&SettingKey::EventName(None)).await.unwrap(),
            Some(SettingValue::Text("Winter Fair".into()))
        );
    }

    #[tokio::test]
    async fn get_all_settings_is_keyed_by_wire_key() {
        let (repo, _dir) = test_repository().await;
        repo.set_setting(&SettingKey::MaxCapacity, &SettingValue::Integer(25))
            .await
            .unwrap();
        repo.set_setting(
            &SettingKey::EventName(Some("business".into())),
            &SettingValue::Text("Business Fair".into()),
        )
        .await
        .unwrap();

        let map = repo.get_all_settings().await.unwrap();
        assert_eq!(map.get("max_capacity"), Some(&SettingValue::Integer(25)));
        assert_eq!(
            map.get("event_name_business"),
            Some(&SettingValue::Text("Business Fair".into()))
        );
    }
}
