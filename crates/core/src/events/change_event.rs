//! Change event types.

use serde::{Deserialize, Serialize};

use crate::registrations::Registration;
use crate::settings::SettingValue;

/// Broadcast event name for created registrations.
pub const NEW_REGISTRATION: &str = "new-registration";
/// Broadcast event name for status/remark updates.
pub const REGISTRATION_UPDATED: &str = "registration-updated";
/// Broadcast event name for deletions.
pub const REGISTRATION_DELETED: &str = "registration-deleted";
/// Broadcast event name for clear operations.
pub const REGISTRATIONS_CLEARED: &str = "registrations-cleared";
/// Broadcast event name for settings changes.
pub const SETTINGS_UPDATED: &str = "settings-updated";

/// Normalized notification of a confirmed state mutation.
///
/// Each event carries enough payload for a subscriber to apply it without
/// a follow-up fetch. Dispatchers emit exactly one event per successful
/// mutation that affects visible state, and none on failure.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A registration was created.
    Created { registration: Registration },

    /// A registration's status or remark changed. Carries the full record
    /// so subscribers replace it in place.
    Updated { registration: Registration },

    /// A registration was deleted.
    Deleted {
        id: i64,
        category: Option<String>,
    },

    /// All registrations were removed, optionally within one category.
    Cleared { category: Option<String> },

    /// A setting changed; `key` is the wire key.
    SettingChanged { key: String, value: SettingValue },
}

impl ChangeEvent {
    /// The transport-level event name for this mutation kind.
    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::Created { .. } => NEW_REGISTRATION,
            ChangeEvent::Updated { .. } => REGISTRATION_UPDATED,
            ChangeEvent::Deleted { .. } => REGISTRATION_DELETED,
            ChangeEvent::Cleared { .. } => REGISTRATIONS_CLEARED,
            ChangeEvent::SettingChanged { .. } => SETTINGS_UPDATED,
        }
    }

    /// The category partition this event belongs to, if any. Settings
    /// changes are global.
    pub fn category(&self) -> Option<&str> {
        match self {
            ChangeEvent::Created { registration } | ChangeEvent::Updated { registration } => {
                registration.category.as_deref()
            }
            ChangeEvent::Deleted { category, .. } | ChangeEvent::Cleared { category } => {
                category.as_deref()
            }
            ChangeEvent::SettingChanged { .. } => None,
        }
    }
}
