//! Settings module - typed schema, service, and traits.

mod settings_model;
mod settings_service;
mod settings_traits;

pub use settings_model::{
    decode_setting, default_settings, default_status_vocabulary, encode_setting, SettingKey,
    SettingValue, SettingsMap, StatusOption,
};
pub use settings_service::{SettingsService, SettingsServiceTrait};
pub use settings_traits::SettingsRepositoryTrait;
