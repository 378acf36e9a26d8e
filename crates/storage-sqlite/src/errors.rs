//! Storage-specific error types for SQLite operations.
//!
//! Wraps Diesel and r2d2 errors and converts them into the store-agnostic
//! error types defined in `regdeck_core` before they leave this crate.

use diesel::result::Error as DieselError;
use regdeck_core::errors::{Error, StoreError};
use thiserror::Error;

/// Errors internal to the SQLite storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Core error: {0}")]
    CoreError(String),
}

// The write actor wraps jobs in a transaction whose error type must absorb
// core errors coming out of the job body.
impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::CoreError(err.to_string())
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Store(StoreError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Store(StoreError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::NotFound("record not found".to_string())
            }
            StorageError::QueryFailed(e) => Error::Store(StoreError::QueryFailed(e.to_string())),
            StorageError::MigrationFailed(e) => Error::Store(StoreError::MigrationFailed(e)),
            StorageError::CoreError(e) => Error::Store(StoreError::Internal(e)),
        }
    }
}
