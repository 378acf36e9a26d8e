//! Shared constants: status vocabulary defaults and classification.

use std::time::Duration;

/// Status assigned to newly created registrations.
pub const DEFAULT_STATUS: &str = "registered";

/// Statuses counted as "waiting" for queue statistics.
pub const WAITING_STATUSES: &[&str] = &["waiting", "urgent"];

/// Statuses counted as "in progress"; first entry stamps `time_in`.
pub const IN_PROGRESS_STATUSES: &[&str] = &["inside", "consulting"];

/// Terminal statuses; entries in these states leave the queue.
pub const TERMINAL_STATUSES: &[&str] = &["ended", "noanswer", "exited"];

/// Server-side debounce window for duplicate mutation requests.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Default maximum venue capacity, used until an admin configures one.
pub const DEFAULT_MAX_CAPACITY: u32 = 50;

/// Default event name seeded on first boot.
pub const DEFAULT_EVENT_NAME: &str = "Career Fair 2024 职业博览会";

/// Default programme list seeded on first boot.
pub const DEFAULT_PROGRAMMES: &[&str] = &[
    "Computer Science 计算机科学",
    "Business Administration 工商管理",
    "Engineering 工程学",
    "Medicine 医学",
    "Law 法律",
    "Arts & Design 艺术与设计",
    "Education 教育",
    "Finance 金融",
    "Marketing 市场营销",
    "Others 其他",
];

pub fn is_waiting_like(status: &str) -> bool {
    WAITING_STATUSES.contains(&status)
}

pub fn is_in_progress(status: &str) -> bool {
    IN_PROGRESS_STATUSES.contains(&status)
}

pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

/// Display priority band for a status. Lower sorts first. Within a band
/// entries keep arrival order; this never reorders the reconciled list
/// itself.
pub fn queue_tier(status: &str) -> u8 {
    match status {
        "urgent" => 0,
        "consulting" => 2,
        s if is_terminal(s) => 3,
        _ => 1,
    }
}
