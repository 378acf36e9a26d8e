//! Registration domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attendee's queue entry.
///
/// `id`, `timestamp`, and `updated_at` are assigned and maintained by the
/// store. `student_name`, `phone_number`, and `programme` are immutable
/// after creation; there is no edit path for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub student_name: String,
    pub phone_number: String,
    pub programme: String,
    /// Optional partition tag. When present, all views and broadcasts are
    /// scoped by it; absent in single-category deployments.
    pub category: Option<String>,
    pub status: String,
    #[serde(default)]
    pub remark: String,
    pub timestamp: DateTime<Utc>,
    /// Stamped the first time status enters an in-progress state; never
    /// reset afterwards.
    pub time_in: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub student_name: String,
    pub phone_number: String,
    pub programme: String,
    #[serde(default)]
    pub category: Option<String>,
}
