use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;

use crate::wire::{RemoteEnvelope, RemoteRegistration};
use regdeck_core::errors::{Error, Result, StoreError};
use regdeck_core::registrations::{
    NewRegistration, Registration, RegistrationRepositoryTrait,
};
use regdeck_core::settings::{
    decode_setting, encode_setting, SettingKey, SettingValue, SettingsMap,
    SettingsRepositoryTrait,
};

/// Bound on every scripting-endpoint round-trip.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct RemoteStoreConfig {
    /// Deployment URL of the scripting endpoint.
    pub script_url: String,
    pub request_timeout: Duration,
}

impl RemoteStoreConfig {
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Repository implementation proxying to the spreadsheet script.
///
/// Implements both store traits; the remote endpoint is the single writer
/// of durable state and each call is one bounded, non-retried round-trip.
pub struct RemoteStore {
    client: reqwest::Client,
    config: RemoteStoreConfig,
}

impl RemoteStore {
    pub fn new(config: RemoteStoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn call<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<Option<T>> {
        debug!("Remote store call: {:?}", params.first());
        let response = self
            .client
            .get(&self.config.script_url)
            .query(params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let envelope: RemoteEnvelope<T> = response
            .json()
            .await
            .map_err(|e| StoreError::Remote(format!("invalid response body: {e}")))?;

        if !envelope.success {
            let message = envelope.error.unwrap_or_else(|| "unknown error".into());
            if envelope.code.as_deref() == Some("not_found") {
                return Err(Error::NotFound(message));
            }
            return Err(StoreError::Remote(message).into());
        }
        Ok(envelope.data)
    }

    /// Like [`Self::call`] but the action must return a payload.
    async fn call_expecting<T: DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T> {
        self.call(params).await?.ok_or_else(|| {
            StoreError::Remote("endpoint reported success without data".into()).into()
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        StoreError::Timeout(err.to_string()).into()
    } else if err.is_connect() {
        StoreError::ConnectionFailed(err.to_string()).into()
    } else {
        StoreError::QueryFailed(err.to_string()).into()
    }
}

#[async_trait]
impl RegistrationRepositoryTrait for RemoteStore {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Registration>> {
        let mut params = vec![("action", "getAll")];
        if let Some(c) = category {
            params.push(("category", c));
        }
        let rows: Vec<RemoteRegistration> = self.call_expecting(&params).await?;
        let mut registrations = Vec::with_capacity(rows.len());
        for row in rows {
            let registration = Registration::try_from(row)?;
            // Older script deployments ignore the category parameter.
            if category.is_some() && registration.category.as_deref() != category {
                continue;
            }
            registrations.push(registration);
        }
        registrations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(registrations)
    }

    async fn get(&self, registration_id: i64) -> Result<Option<Registration>> {
        let id_param = registration_id.to_string();
        match self
            .call_expecting::<RemoteRegistration>(&[("action", "getById"), ("id", &id_param)])
            .await
        {
            Ok(row) => Ok(Some(Registration::try_from(row)?)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, new_registration: NewRegistration) -> Result<Registration> {
        let mut params = vec![
            ("action", "add"),
            ("student_name", new_registration.student_name.as_str()),
            ("phone_number", new_registration.phone_number.as_str()),
            ("programme", new_registration.programme.as_str()),
        ];
        if let Some(c) = new_registration.category.as_deref() {
            params.push(("category", c));
        }
        let row: RemoteRegistration = self.call_expecting(&params).await?;
        Registration::try_from(row)
    }

    async fn update_status(
        &self,
        registration_id: i64,
        status: &str,
        enters_progress: bool,
    ) -> Result<Registration> {
        let id_param = registration_id.to_string();
        // The script stamps time_in first-entry-only when asked to.
        let stamp = if enters_progress { "1" } else { "0" };
        let row: RemoteRegistration = self
            .call_expecting(&[
                ("action", "updateStatus"),
                ("id", &id_param),
                ("status", status),
                ("stamp_time_in", stamp),
            ])
            .await?;
        Registration::try_from(row)
    }

    async fn update_remark(&self, registration_id: i64, remark: &str) -> Result<Registration> {
        let id_param = registration_id.to_string();
        let row: RemoteRegistration = self
            .call_expecting(&[
                ("action", "updateRemark"),
                ("id", &id_param),
                ("remark", remark),
            ])
            .await?;
        Registration::try_from(row)
    }

    async fn delete(&self, registration_id: i64) -> Result<usize> {
        let id_param = registration_id.to_string();
        match self
            .call::<serde_json::Value>(&[("action", "delete"), ("id", &id_param)])
            .await
        {
            Ok(_) => Ok(1),
            Err(Error::NotFound(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    async fn clear_all(&self, category: Option<&str>) -> Result<()> {
        let mut params = vec![("action", "clear")];
        if let Some(c) = category {
            params.push(("category", c));
        }
        self.call::<serde_json::Value>(&params).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepositoryTrait for RemoteStore {
    async fn get_setting(&self, key: &SettingKey) -> Result<Option<SettingValue>> {
        let stored: std::collections::HashMap<String, String> =
            self.call_expecting(&[("action", "getSettings")]).await?;
        match stored.get(&key.storage_key()) {
            Some(raw) => Ok(Some(decode_setting(key, raw)?)),
            None => Ok(None),
        }
    }

    async fn set_setting(&self, key: &SettingKey, value: &SettingValue) -> Result<()> {
        let storage_key = key.storage_key();
        let encoded = encode_setting(value);
        self.call::<serde_json::Value>(&[
            ("action", "saveSettings"),
            ("key", &storage_key),
            ("value", &encoded),
        ])
        .await?;
        Ok(())
    }

    async fn get_all_settings(&self) -> Result<SettingsMap> {
        let stored: std::collections::HashMap<String, String> =
            self.call_expecting(&[("action", "getSettings")]).await?;
        let mut map = SettingsMap::new();
        for (raw_key, raw_value) in stored {
            let Ok(key) = SettingKey::parse(&raw_key) else {
                continue;
            };
            if let Ok(value) = decode_setting(&key, &raw_value) {
                map.insert(raw_key, value);
            }
        }
        Ok(map)
    }
}
