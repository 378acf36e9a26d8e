//! Duplicate-mutation suppression.
//!
//! Dashboards routinely send near-identical mutations in quick succession:
//! double-clicked status toggles, retried requests, remark edits landing
//! back to back. The guard tracks the last accepted instant per
//! `(kind, entity)` key and suppresses broadcast for any request arriving
//! inside the window. The mutation itself still reaches the store (single
//! writer, last write wins); only the redundant fan-out is dropped.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::constants::DEBOUNCE_WINDOW;

/// The mutation kinds the guard distinguishes. Creation is never
/// debounced: a new registration has no entity key yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    SetStatus,
    SetRemark,
    Delete,
    Clear,
}

/// Sliding-window duplicate suppression keyed by `(kind, entity)`.
///
/// Explicitly constructed and injectable; tests create their own instance
/// or call [`DebounceGuard::reset`] between cases.
pub struct DebounceGuard {
    window: Duration,
    last_accepted: DashMap<(MutationKind, String), Instant>,
}

impl DebounceGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: DashMap::new(),
        }
    }

    /// Guard with the standard window.
    pub fn with_default_window() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }

    /// Records a request for `(kind, entity)` and reports whether it is
    /// fresh. Returns `false` when a request for the same key was accepted
    /// less than the window ago.
    ///
    /// The check and the timestamp update happen under the map shard lock,
    /// so two near-simultaneous requests cannot both pass.
    pub fn accept(&self, kind: MutationKind, entity: &str) -> bool {
        let now = Instant::now();
        match self.last_accepted.entry((kind, entity.to_string())) {
            Entry::Occupied(mut slot) => {
                if now.duration_since(*slot.get()) < self.window {
                    false
                } else {
                    slot.insert(now);
                    true
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
        }
    }

    /// Forgets one key, so the next request for it counts as fresh. Used
    /// when a mutation fails after passing the check: the retry must not
    /// be treated as a duplicate of a mutation that never happened.
    pub fn forget(&self, kind: MutationKind, entity: &str) {
        self.last_accepted.remove(&(kind, entity.to_string()));
    }

    /// Drops all recorded timestamps.
    pub fn reset(&self) {
        self.last_accepted.clear();
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for DebounceGuard {
    fn default() -> Self {
        Self::with_default_window()
    }
}
