//! Repository trait for settings.

use async_trait::async_trait;

use crate::errors::Result;
use crate::settings::{SettingKey, SettingValue, SettingsMap};

/// Repository trait for the settings store.
///
/// Implementations persist plain strings and convert through
/// [`crate::settings::encode_setting`] / [`crate::settings::decode_setting`];
/// callers only ever see typed values.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get a single setting. Returns `None` if the key was never written.
    async fn get_setting(&self, key: &SettingKey) -> Result<Option<SettingValue>>;

    /// Insert or replace a single setting.
    async fn set_setting(&self, key: &SettingKey, value: &SettingValue) -> Result<()>;

    /// Get every stored setting keyed by wire key. Stored strings that no
    /// longer parse under the schema are skipped, not fatal.
    async fn get_all_settings(&self) -> Result<SettingsMap>;
}
