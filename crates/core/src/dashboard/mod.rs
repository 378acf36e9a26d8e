//! Dashboard module - live view reconciliation and derived statistics.
//!
//! A dashboard session holds a [`DashboardState`]: the locally reconciled,
//! newest-first list of registrations for its category, kept consistent by
//! applying the change events the server broadcasts. Statistics and the
//! queue-priority view are pure functions over that list, so the server
//! reuses them for its stats endpoint.

mod reconciler;
mod stats;

pub use reconciler::DashboardState;
pub use stats::{compute_stats, queue_view, DashboardStats, ProgrammeQueue};
