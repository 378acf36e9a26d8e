//! Repository and service traits for registrations.

use async_trait::async_trait;

use crate::errors::Result;
use crate::registrations::{NewRegistration, Registration};

/// Repository trait for the registration store.
///
/// Implemented by the SQLite backend and the remote spreadsheet proxy.
/// Every call is an asynchronous boundary; implementations must bound
/// their own I/O and never retry a timed-out call.
#[async_trait]
pub trait RegistrationRepositoryTrait: Send + Sync {
    /// List registrations, newest first, optionally scoped to a category.
    async fn list(&self, category: Option<&str>) -> Result<Vec<Registration>>;

    /// Fetch a single registration.
    async fn get(&self, registration_id: i64) -> Result<Option<Registration>>;

    /// Insert a new registration; the store assigns id and timestamp.
    async fn create(&self, new_registration: NewRegistration) -> Result<Registration>;

    /// Update the status of a registration. When `enters_progress` is set,
    /// the store stamps `time_in` only if it is not already set.
    ///
    /// Fails with `Error::NotFound` if the id is absent.
    async fn update_status(
        &self,
        registration_id: i64,
        status: &str,
        enters_progress: bool,
    ) -> Result<Registration>;

    /// Replace the remark of a registration.
    async fn update_remark(&self, registration_id: i64, remark: &str) -> Result<Registration>;

    /// Delete a registration, returning the number of rows removed.
    async fn delete(&self, registration_id: i64) -> Result<usize>;

    /// Remove all registrations, or all within one category. An unscoped
    /// clear also resets the store's id numbering.
    async fn clear_all(&self, category: Option<&str>) -> Result<()>;
}

/// Service trait for registration mutations and queries.
#[async_trait]
pub trait RegistrationServiceTrait: Send + Sync {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Registration>>;
    async fn create(&self, new_registration: NewRegistration) -> Result<Registration>;
    async fn set_status(&self, registration_id: i64, status: &str) -> Result<Registration>;
    async fn set_remark(&self, registration_id: i64, remark: &str) -> Result<Registration>;
    async fn delete(&self, registration_id: i64) -> Result<()>;
    async fn clear(&self, category: Option<&str>) -> Result<()>;
}
