use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_query;

use super::model::{NewRegistrationDB, RegistrationDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::registrations::dsl::*;
use regdeck_core::constants::DEFAULT_STATUS;
use regdeck_core::errors::{Error, Result};
use regdeck_core::registrations::{NewRegistration, Registration, RegistrationRepositoryTrait};

pub struct RegistrationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RegistrationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RegistrationRepository { pool, writer }
    }
}

#[async_trait]
impl RegistrationRepositoryTrait for RegistrationRepository {
    async fn list(&self, list_category: Option<&str>) -> Result<Vec<Registration>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = registrations.into_boxed();
        if let Some(c) = list_category {
            query = query.filter(category.eq(c.to_string()));
        }
        let rows = query
            .order((timestamp.desc(), id.desc()))
            .load::<RegistrationDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Registration::from).collect())
    }

    async fn get(&self, registration_id: i64) -> Result<Option<Registration>> {
        let mut conn = get_connection(&self.pool)?;
        let row = registrations
            .find(registration_id)
            .first::<RegistrationDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Registration::from))
    }

    async fn create(&self, new_registration: NewRegistration) -> Result<Registration> {
        let now = Utc::now().naive_utc();
        let row = NewRegistrationDB {
            student_name: new_registration.student_name,
            phone_number: new_registration.phone_number,
            programme: new_registration.programme,
            category: new_registration.category,
            status: DEFAULT_STATUS.to_string(),
            remark: String::new(),
            timestamp: now,
            updated_at: now,
        };

        self.writer
            .exec(move |conn| -> Result<Registration> {
                let created = diesel::insert_into(registrations)
                    .values(&row)
                    .returning(RegistrationDB::as_returning())
                    .get_result::<RegistrationDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Registration::from(created))
            })
            .await
    }

    async fn update_status(
        &self,
        registration_id: i64,
        new_status: &str,
        enters_progress: bool,
    ) -> Result<Registration> {
        let new_status = new_status.to_string();
        let now = Utc::now().naive_utc();

        self.writer
            .exec(move |conn| -> Result<Registration> {
                let affected = diesel::update(registrations.find(registration_id))
                    .set((status.eq(&new_status), updated_at.eq(now)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!(
                        "registration {registration_id}"
                    )));
                }

                // First entry into an in-progress state stamps time_in;
                // later transitions leave the original stamp untouched.
                if enters_progress {
                    diesel::update(
                        registrations
                            .find(registration_id)
                            .filter(time_in.is_null()),
                    )
                    .set(time_in.eq(now))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }

                let row = registrations
                    .find(registration_id)
                    .first::<RegistrationDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Registration::from(row))
            })
            .await
    }

    async fn update_remark(&self, registration_id: i64, new_remark: &str) -> Result<Registration> {
        let new_remark = new_remark.to_string();
        let now = Utc::now().naive_utc();

        self.writer
            .exec(move |conn| -> Result<Registration> {
                let affected = diesel::update(registrations.find(registration_id))
                    .set((remark.eq(&new_remark), updated_at.eq(now)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!(
                        "registration {registration_id}"
                    )));
                }
                let row = registrations
                    .find(registration_id)
                    .first::<RegistrationDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Registration::from(row))
            })
            .await
    }

    async fn delete(&self, registration_id: i64) -> Result<usize> {
        self.writer
            .exec(move |conn| -> Result<usize> {
                Ok(diesel::delete(registrations.find(registration_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn clear_all(&self, clear_category: Option<&str>) -> Result<()> {
        let clear_category = clear_category.map(str::to_string);
        self.writer
            .exec(move |conn| -> Result<()> {
                match clear_category {
                    Some(c) => {
                        diesel::delete(registrations.filter(category.eq(c)))
                            .execute(conn)
                            .map_err(StorageError::from)?;
                    }
                    None => {
                        diesel::delete(registrations)
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        // Restart id numbering for the next event.
                        sql_query("DELETE FROM sqlite_sequence WHERE name = 'registrations'")
                            .execute(conn)
                            .map_err(StorageError::from)?;
                    }
                }
                Ok(())
            })
            .await
    }
}
