//! SQLite storage implementation for registrations.

mod model;
mod repository;

pub use model::{NewRegistrationDB, RegistrationDB};
pub use repository::RegistrationRepository;

// Re-export trait from core for convenience
pub use regdeck_core::registrations::RegistrationRepositoryTrait;
