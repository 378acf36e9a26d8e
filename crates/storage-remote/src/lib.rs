//! Remote storage proxy for Regdeck.
//!
//! This crate provides the proxy deployment variant: registrations and
//! settings live in a spreadsheet behind a scripting endpoint, and every
//! repository call becomes one HTTP round-trip using the endpoint's
//! `action=` query protocol.
//!
//! Store calls are bounded by a client-side timeout (30 seconds by
//! default) and are never retried automatically; a timed-out call is
//! surfaced as `StoreError::Timeout`.

mod repository;
mod wire;

pub use repository::{RemoteStore, RemoteStoreConfig};

// Re-export from regdeck-core for convenience
pub use regdeck_core::errors::{Error, Result, StoreError};
