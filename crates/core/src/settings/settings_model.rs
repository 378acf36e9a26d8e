//! Typed settings schema.
//!
//! Settings are a flat map of known keys to known value types. The store
//! persists plain strings; [`encode_setting`] and [`decode_setting`] are
//! the only place structured values are serialized, so nothing above the
//! storage layer ever handles strings-that-might-be-JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_MAX_CAPACITY, DEFAULT_PROGRAMMES};
use crate::errors::{Error, Result, ValidationError};

/// One entry of the status vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusOption {
    pub value: String,
    pub label: String,
    pub color: String,
}

/// Full settings view keyed by wire key.
pub type SettingsMap = BTreeMap<String, SettingValue>;

/// The known setting keys. Category-scoped deployments suffix the event
/// name and programme list with the category tag
/// (`event_name_science`, `programmes_business`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingKey {
    EventName(Option<String>),
    Programmes(Option<String>),
    MaxCapacity,
    Statuses,
    DashboardPassword,
}

impl SettingKey {
    /// Parses a wire key. Unknown keys are rejected; the settings bag is a
    /// closed schema.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "event_name" => Ok(Self::EventName(None)),
            "programmes" => Ok(Self::Programmes(None)),
            "max_capacity" => Ok(Self::MaxCapacity),
            "statuses" => Ok(Self::Statuses),
            "dashboard_password" => Ok(Self::DashboardPassword),
            _ => {
                if let Some(category) = raw.strip_prefix("event_name_") {
                    if !category.is_empty() {
                        return Ok(Self::EventName(Some(category.to_string())));
                    }
                } else if let Some(category) = raw.strip_prefix("programmes_") {
                    if !category.is_empty() {
                        return Ok(Self::Programmes(Some(category.to_string())));
                    }
                }
                Err(Error::Validation(ValidationError::UnknownSettingKey(
                    raw.to_string(),
                )))
            }
        }
    }

    /// The wire/storage string form of this key.
    pub fn storage_key(&self) -> String {
        match self {
            Self::EventName(None) => "event_name".to_string(),
            Self::EventName(Some(category)) => format!("event_name_{category}"),
            Self::Programmes(None) => "programmes".to_string(),
            Self::Programmes(Some(category)) => format!("programmes_{category}"),
            Self::MaxCapacity => "max_capacity".to_string(),
            Self::Statuses => "statuses".to_string(),
            Self::DashboardPassword => "dashboard_password".to_string(),
        }
    }

    /// Decodes an incoming JSON value into the typed value for this key,
    /// validating as it goes.
    pub fn decode_value(&self, raw: Value) -> Result<SettingValue> {
        let invalid = |msg: String| Error::Validation(ValidationError::InvalidInput(msg));
        match self {
            Self::EventName(_) | Self::DashboardPassword => match raw {
                Value::String(s) => Ok(SettingValue::Text(s)),
                other => Err(invalid(format!(
                    "expected a string for '{}', got {other}",
                    self.storage_key()
                ))),
            },
            Self::MaxCapacity => {
                let n = match &raw {
                    Value::Number(n) => n.as_u64(),
                    // Admin forms historically posted the capacity as text.
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                };
                match n {
                    Some(n) if n > 0 && n <= u32::MAX as u64 => {
                        Ok(SettingValue::Integer(n as u32))
                    }
                    _ => Err(invalid("max_capacity must be a positive integer".into())),
                }
            }
            Self::Programmes(_) => {
                let list: Vec<String> = serde_json::from_value(raw)
                    .map_err(|e| invalid(format!("programmes must be a list of strings: {e}")))?;
                let mut seen = std::collections::HashSet::new();
                for programme in &list {
                    if !seen.insert(programme.as_str()) {
                        return Err(invalid(format!("duplicate programme '{programme}'")));
                    }
                }
                Ok(SettingValue::List(list))
            }
            Self::Statuses => {
                let statuses: Vec<StatusOption> = serde_json::from_value(raw).map_err(|e| {
                    invalid(format!("statuses must be a list of value/label/color: {e}"))
                })?;
                if statuses.is_empty() {
                    return Err(invalid("status vocabulary must not be empty".into()));
                }
                Ok(SettingValue::Statuses(statuses))
            }
        }
    }
}

/// A typed setting value.
///
/// Serde representation is untagged, so a settings map serializes to the
/// plain JSON shape clients expect (strings, numbers, arrays).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SettingValue {
    Integer(u32),
    Text(String),
    List(Vec<String>),
    Statuses(Vec<StatusOption>),
}

impl SettingValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u32> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_statuses(&self) -> Option<&[StatusOption]> {
        match self {
            Self::Statuses(options) => Some(options),
            _ => None,
        }
    }
}

/// Encodes a typed value to the string form the store persists.
/// Structured values become JSON strings; scalars are stored verbatim.
pub fn encode_setting(value: &SettingValue) -> String {
    match value {
        SettingValue::Text(s) => s.clone(),
        SettingValue::Integer(n) => n.to_string(),
        SettingValue::List(items) => serde_json::to_string(items).unwrap_or_default(),
        SettingValue::Statuses(options) => serde_json::to_string(options).unwrap_or_default(),
    }
}

/// Decodes a stored string back into the typed value for `key`.
pub fn decode_setting(key: &SettingKey, raw: &str) -> Result<SettingValue> {
    match key {
        SettingKey::EventName(_) | SettingKey::DashboardPassword => {
            Ok(SettingValue::Text(raw.to_string()))
        }
        SettingKey::MaxCapacity => {
            let n = raw.trim().parse::<u32>().map_err(|_| {
                Error::Store(crate::errors::StoreError::Internal(format!(
                    "stored max_capacity '{raw}' is not an integer"
                )))
            })?;
            Ok(SettingValue::Integer(n))
        }
        SettingKey::Programmes(_) => {
            let items: Vec<String> = serde_json::from_str(raw)?;
            Ok(SettingValue::List(items))
        }
        SettingKey::Statuses => {
            let options: Vec<StatusOption> = serde_json::from_str(raw)?;
            Ok(SettingValue::Statuses(options))
        }
    }
}

/// The status vocabulary seeded on first boot.
pub fn default_status_vocabulary() -> Vec<StatusOption> {
    let triple = |value: &str, label: &str, color: &str| StatusOption {
        value: value.to_string(),
        label: label.to_string(),
        color: color.to_string(),
    };
    vec![
        triple("registered", "Registered 已登记", "#f8f9fa"),
        triple("waiting", "Waiting 等候中", "#fff3cd"),
        triple("urgent", "Urgent 紧急", "#f8d7da"),
        triple("consulting", "Consulting 咨询中", "#d1ecf1"),
        triple("inside", "Inside 进行中", "#d4edda"),
        triple("ended", "Ended 已结束", "#cce5ff"),
        triple("noanswer", "No Answer 未接听", "#e2d9f3"),
        triple("exited", "Exited 已离开", "#e2e3e5"),
    ]
}

/// The key/value pairs seeded on first boot.
pub fn default_settings() -> Vec<(SettingKey, SettingValue)> {
    vec![
        (
            SettingKey::EventName(None),
            SettingValue::Text(crate::constants::DEFAULT_EVENT_NAME.to_string()),
        ),
        (
            SettingKey::MaxCapacity,
            SettingValue::Integer(DEFAULT_MAX_CAPACITY),
        ),
        (
            SettingKey::Programmes(None),
            SettingValue::List(DEFAULT_PROGRAMMES.iter().map(|p| p.to_string()).collect()),
        ),
        (
            SettingKey::Statuses,
            SettingValue::Statuses(default_status_vocabulary()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_and_scoped_keys() {
        assert_eq!(
            SettingKey::parse("event_name").unwrap(),
            SettingKey::EventName(None)
        );
        assert_eq!(
            SettingKey::parse("event_name_science").unwrap(),
            SettingKey::EventName(Some("science".into()))
        );
        assert_eq!(
            SettingKey::parse("programmes_business").unwrap(),
            SettingKey::Programmes(Some("business".into()))
        );
        assert!(SettingKey::parse("favourite_color").is_err());
        assert!(SettingKey::parse("event_name_").is_err());
    }

    #[test]
    fn storage_key_round_trips() {
        for raw in [
            "event_name",
            "event_name_science",
            "programmes",
            "programmes_business",
            "max_capacity",
            "statuses",
            "dashboard_password",
        ] {
            assert_eq!(SettingKey::parse(raw).unwrap().storage_key(), raw);
        }
    }

    #[test]
    fn capacity_accepts_numbers_and_numeric_strings() {
        let key = SettingKey::MaxCapacity;
        assert_eq!(
            key.decode_value(json!(80)).unwrap(),
            SettingValue::Integer(80)
        );
        assert_eq!(
            key.decode_value(json!("35")).unwrap(),
            SettingValue::Integer(35)
        );
        assert!(key.decode_value(json!(0)).is_err());
        assert!(key.decode_value(json!(-3)).is_err());
        assert!(key.decode_value(json!("many")).is_err());
    }

    #[test]
    fn programmes_must_be_unique() {
        let key = SettingKey::Programmes(None);
        assert!(key.decode_value(json!(["CS", "Law"])).is_ok());
        assert!(key.decode_value(json!(["CS", "CS"])).is_err());
    }

    #[test]
    fn structured_values_survive_the_store_boundary() {
        let key = SettingKey::Programmes(None);
        let value = SettingValue::List(vec!["CS".into(), "Law".into()]);
        let stored = encode_setting(&value);
        assert_eq!(stored, r#"["CS","Law"]"#);
        assert_eq!(decode_setting(&key, &stored).unwrap(), value);

        let key = SettingKey::Statuses;
        let value = SettingValue::Statuses(default_status_vocabulary());
        assert_eq!(decode_setting(&key, &encode_setting(&value)).unwrap(), value);

        let key = SettingKey::MaxCapacity;
        let value = SettingValue::Integer(50);
        assert_eq!(encode_setting(&value), "50");
        assert_eq!(decode_setting(&key, "50").unwrap(), value);
    }

    #[test]
    fn untagged_serialization_matches_client_shape() {
        let map: SettingsMap = [
            ("event_name".to_string(), SettingValue::Text("Fair".into())),
            ("max_capacity".to_string(), SettingValue::Integer(50)),
            (
                "programmes".to_string(),
                SettingValue::List(vec!["CS".into()]),
            ),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["event_name"], json!("Fair"));
        assert_eq!(json["max_capacity"], json!(50));
        assert_eq!(json["programmes"], json!(["CS"]));
    }
}
