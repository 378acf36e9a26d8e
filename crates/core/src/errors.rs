//! Core error types for the registration dashboard.
//!
//! This module defines store-agnostic error types. Backend-specific errors
//! (from Diesel, reqwest, etc.) are converted to these types by the storage
//! crates before they reach callers.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Store-agnostic error type for persistence operations.
///
/// Uses `String` for the details so that both the SQLite backend and the
/// remote proxy backend can convert their own error types into this form.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to establish a connection to the backing store.
    #[error("Failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create store pool: {0}")]
    PoolCreationFailed(String),

    /// A store query or request failed to execute.
    #[error("Store query failed: {0}")]
    QueryFailed(String),

    /// A store call exceeded its bounded timeout. Not retried automatically.
    #[error("Store call timed out: {0}")]
    Timeout(String),

    /// Store migration failed.
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// The remote endpoint answered with a failure envelope.
    #[error("Remote store rejected the request: {0}")]
    Remote(String),

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown status '{0}'")]
    UnknownStatus(String),

    #[error("Unknown setting key '{0}'")]
    UnknownSettingKey(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
