//! SQLite storage implementation for Regdeck.
//!
//! This crate provides the embedded-database deployment variant using
//! Diesel with SQLite. It implements the repository traits defined in
//! `regdeck-core` and contains:
//! - Connection pooling and database initialization
//! - Embedded Diesel migrations
//! - Repository implementations for registrations and settings
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place where Diesel dependencies exist; the core
//! crate is store-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod registrations;
pub mod settings;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from regdeck-core for convenience
pub use regdeck_core::errors::{Error, Result, StoreError};
