//! Registrations module - domain models, services, and traits.

mod registrations_model;
mod registrations_service;
mod registrations_traits;

pub use registrations_model::{NewRegistration, Registration};
pub use registrations_service::RegistrationService;
pub use registrations_traits::{RegistrationRepositoryTrait, RegistrationServiceTrait};
