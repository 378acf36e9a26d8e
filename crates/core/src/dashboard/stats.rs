//! Derived queue statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{is_in_progress, is_waiting_like, queue_tier};
use crate::registrations::Registration;

/// Waiting pressure for one programme.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammeQueue {
    pub programme: String,
    pub waiting: usize,
}

/// Statistics recomputed after every reconciled mutation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub waiting_count: usize,
    pub in_progress_count: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub max_capacity: u32,
    pub available_slots: u32,
    /// Waiting entries grouped by programme, busiest first; ties keep
    /// first-seen order.
    pub programme_queue: Vec<ProgrammeQueue>,
    /// Id of the earliest-created entry still waiting.
    pub longest_waiting_id: Option<i64>,
}

/// Computes statistics over a reconciled list.
pub fn compute_stats(items: &[Registration], max_capacity: u32) -> DashboardStats {
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut waiting_count = 0;
    let mut in_progress_count = 0usize;

    for item in items {
        *status_counts.entry(item.status.clone()).or_default() += 1;
        if is_waiting_like(&item.status) {
            waiting_count += 1;
        }
        if is_in_progress(&item.status) {
            in_progress_count += 1;
        }
    }

    // Available capacity clamps at zero even when the floor is over-full.
    let available_slots =
        max_capacity.saturating_sub(u32::try_from(in_progress_count).unwrap_or(u32::MAX));

    // Group waiting entries by programme in first-seen order (oldest
    // first, the list itself being newest first).
    let mut order: Vec<String> = Vec::new();
    let mut per_programme: BTreeMap<String, usize> = BTreeMap::new();
    for item in items.iter().rev() {
        if !is_waiting_like(&item.status) {
            continue;
        }
        if !per_programme.contains_key(&item.programme) {
            order.push(item.programme.clone());
        }
        *per_programme.entry(item.programme.clone()).or_default() += 1;
    }
    let mut programme_queue: Vec<ProgrammeQueue> = order
        .iter()
        .map(|programme| ProgrammeQueue {
            programme: programme.clone(),
            waiting: per_programme[programme],
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    programme_queue.sort_by(|a, b| b.waiting.cmp(&a.waiting));

    let longest_waiting_id = items
        .iter()
        .filter(|r| is_waiting_like(&r.status))
        .min_by_key(|r| (r.timestamp, r.id))
        .map(|r| r.id);

    DashboardStats {
        total: items.len(),
        waiting_count,
        in_progress_count,
        status_counts,
        max_capacity,
        available_slots,
        programme_queue,
        longest_waiting_id,
    }
}

/// Orders entries into display priority bands without mutating stored
/// order: urgent ahead of the active band, consulting behind it, terminal
/// states last. Within a band entries keep their reconciled order.
pub fn queue_view(items: &[Registration]) -> Vec<&Registration> {
    let mut view: Vec<&Registration> = items.iter().collect();
    view.sort_by_key(|r| queue_tier(&r.status));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(id: i64, programme: &str, status: &str) -> Registration {
        let t = Utc.with_ymd_and_hms(2024, 11, 2, 9, 0, 0).unwrap() + Duration::minutes(id);
        Registration {
            id,
            student_name: format!("S{id}"),
            phone_number: format!("0{id}"),
            programme: programme.into(),
            category: None,
            status: status.into(),
            remark: String::new(),
            timestamp: t,
            time_in: None,
            updated_at: t,
        }
    }

    /// Newest-first list, as the reconciler maintains it.
    fn newest_first(mut items: Vec<Registration>) -> Vec<Registration> {
        items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        items
    }

    #[test]
    fn counts_and_capacity() {
        let items = newest_first(vec![
            entry(1, "CS", "waiting"),
            entry(2, "CS", "urgent"),
            entry(3, "Law", "inside"),
            entry(4, "Law", "consulting"),
            entry(5, "Law", "ended"),
        ]);
        let stats = compute_stats(&items, 3);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.waiting_count, 2);
        assert_eq!(stats.in_progress_count, 2);
        assert_eq!(stats.available_slots, 1);
        assert_eq!(stats.status_counts["waiting"], 1);
        assert_eq!(stats.status_counts["urgent"], 1);
    }

    #[test]
    fn available_slots_clamp_to_zero() {
        let items = newest_first(vec![
            entry(1, "CS", "inside"),
            entry(2, "CS", "inside"),
            entry(3, "CS", "consulting"),
        ]);
        let stats = compute_stats(&items, 2);
        assert_eq!(stats.available_slots, 0);

        let stats = compute_stats(&[], 0);
        assert_eq!(stats.available_slots, 0);
    }

    #[test]
    fn programme_ranking_sorts_by_count_then_first_seen() {
        // Law appears before Arts among the waiting (older entries first);
        // both have one waiter, CS has two.
        let items = newest_first(vec![
            entry(1, "Law", "waiting"),
            entry(2, "Arts", "waiting"),
            entry(3, "CS", "waiting"),
            entry(4, "CS", "urgent"),
            entry(5, "CS", "ended"),
        ]);
        let stats = compute_stats(&items, 50);
        let ranking: Vec<(&str, usize)> = stats
            .programme_queue
            .iter()
            .map(|p| (p.programme.as_str(), p.waiting))
            .collect();
        assert_eq!(ranking, vec![("CS", 2), ("Law", 1), ("Arts", 1)]);
    }

    #[test]
    fn longest_waiting_is_the_earliest_created_waiter() {
        let items = newest_first(vec![
            entry(1, "CS", "ended"),
            entry(2, "CS", "waiting"),
            entry(3, "CS", "urgent"),
            entry(4, "CS", "inside"),
        ]);
        let stats = compute_stats(&items, 50);
        assert_eq!(stats.longest_waiting_id, Some(2));
    }

    #[test]
    fn no_waiters_means_no_longest_waiting() {
        let items = vec![entry(1, "CS", "inside")];
        let stats = compute_stats(&items, 50);
        assert_eq!(stats.longest_waiting_id, None);
        assert!(stats.programme_queue.is_empty());
    }

    #[test]
    fn queue_view_bands_keep_arrival_order_within_a_tier() {
        let items = newest_first(vec![
            entry(1, "CS", "waiting"),
            entry(2, "CS", "urgent"),
            entry(3, "CS", "consulting"),
            entry(4, "CS", "ended"),
            entry(5, "CS", "inside"),
        ]);
        let ids: Vec<i64> = queue_view(&items).iter().map(|r| r.id).collect();
        // urgent first, then the active band in reconciled (newest-first)
        // order, then consulting, then terminal.
        assert_eq!(ids, vec![2, 5, 1, 3, 4]);
    }
}
