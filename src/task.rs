// Task model and timestamp helpers

use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// Wire field names stay camelCase so a slot written by earlier versions
/// of the application restores unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "completedAt")]
    pub completed_at: Option<i64>,
}

impl Task {
    /// Create a fresh, incomplete task. `text` is assumed already trimmed
    /// and non-empty; the store enforces that before calling.
    pub fn new(id: i64, text: String, created_at: i64) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Set or clear the completed flag, keeping `completed_at` coupled to it.
    pub fn set_completed(&mut self, completed: bool, now: i64) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }
}

/// Current timestamp in milliseconds since epoch
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}

/// Format a millisecond timestamp for list output, e.g. "Jan 5, 14:03"
pub fn format_timestamp(ms: i64) -> String {
    use chrono::{Local, LocalResult, TimeZone};
    match Local.timestamp_millis_opt(ms) {
        LocalResult::Single(dt) => dt.format("%b %-d, %H:%M").to_string(),
        _ => ms.to_string(),
    }
}
