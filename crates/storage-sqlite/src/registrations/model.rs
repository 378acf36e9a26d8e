//! Database models for registrations.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;

use regdeck_core::registrations::Registration;

/// Database row for a registration.
#[derive(Queryable, Identifiable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::registrations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RegistrationDB {
    pub id: i64,
    pub student_name: String,
    pub phone_number: String,
    pub programme: String,
    pub category: Option<String>,
    pub status: String,
    pub remark: String,
    pub timestamp: NaiveDateTime,
    pub time_in: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

/// Insertable row for a new registration. The id comes from the table's
/// AUTOINCREMENT column.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::registrations)]
pub struct NewRegistrationDB {
    pub student_name: String,
    pub phone_number: String,
    pub programme: String,
    pub category: Option<String>,
    pub status: String,
    pub remark: String,
    pub timestamp: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Timestamps are stored naive in UTC.
impl From<RegistrationDB> for Registration {
    fn from(db: RegistrationDB) -> Self {
        Self {
            id: db.id,
            student_name: db.student_name,
            phone_number: db.phone_number,
            programme: db.programme,
            category: db.category,
            status: db.status,
            remark: db.remark,
            timestamp: Utc.from_utc_datetime(&db.timestamp),
            time_in: db.time_in.map(|t| Utc.from_utc_datetime(&t)),
            updated_at: Utc.from_utc_datetime(&db.updated_at),
        }
    }
}
