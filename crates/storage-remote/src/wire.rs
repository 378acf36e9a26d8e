//! Wire types for the scripting endpoint.
//!
//! The endpoint answers every action with a `{success, data, error}`
//! envelope. Registration rows use the sheet's snake_case column names
//! and ISO-8601 UTC timestamps.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use regdeck_core::errors::{Result, StoreError};
use regdeck_core::registrations::Registration;

/// Response envelope returned by the scripting endpoint.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RemoteEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    /// Machine-readable failure code; `not_found` maps to a NotFound error.
    #[serde(default)]
    pub code: Option<String>,
}

/// One registration row as the sheet stores it.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRegistration {
    pub id: i64,
    pub student_name: String,
    pub phone_number: String,
    pub programme: String,
    #[serde(default)]
    pub category: Option<String>,
    pub status: String,
    #[serde(default)]
    pub remark: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub time_in: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Parses a sheet timestamp: RFC 3339, or the bare `YYYY-MM-DD HH:MM:SS`
/// form older script revisions emitted.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| StoreError::Remote(format!("unparseable timestamp '{raw}'")).into())
}

impl TryFrom<RemoteRegistration> for Registration {
    type Error = regdeck_core::Error;

    fn try_from(row: RemoteRegistration) -> Result<Registration> {
        let timestamp = parse_timestamp(&row.timestamp)?;
        let time_in = row
            .time_in
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(parse_timestamp)
            .transpose()?;
        let updated_at = row
            .updated_at
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(parse_timestamp)
            .transpose()?
            .unwrap_or(timestamp);
        Ok(Registration {
            id: row.id,
            student_name: row.student_name,
            phone_number: row.phone_number,
            programme: row.programme,
            category: row.category.filter(|c| !c.is_empty()),
            status: row.status,
            remark: row.remark.unwrap_or_default(),
            timestamp,
            time_in,
            updated_at,
        })
    }
}
