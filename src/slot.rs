// Persisted slot: one JSON file holding the full task list

use eyre::{Context, Result};
use fs2::FileExt;
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::task::Task;

/// Raw record shape as stored on disk. Older slots predate the timestamp
/// fields, so both are optional here and backfilled on read.
#[derive(Debug, Deserialize)]
struct StoredTask {
    id: i64,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(rename = "createdAt", default)]
    created_at: Option<i64>,
    #[serde(rename = "completedAt", default)]
    completed_at: Option<i64>,
}

impl StoredTask {
    /// Backfill missing timestamps and normalize the completed/completed_at
    /// coupling: a task can only carry a completion time while completed.
    fn migrate(self, now: i64) -> Task {
        let completed_at = if self.completed {
            Some(self.completed_at.unwrap_or(now))
        } else {
            None
        };
        Task {
            id: self.id,
            text: self.text,
            completed: self.completed,
            created_at: self.created_at.unwrap_or(now),
            completed_at,
        }
    }
}

/// Overwrite the slot wholesale with the given list.
///
/// The file is written in place under an exclusive lock and flushed before
/// the lock is released.
pub fn write_slot(path: &Path, tasks: &[Task]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create slot directory")?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .context("Failed to open slot file for writing")?;

    // Acquire exclusive lock before writing
    file.lock_exclusive().context("Failed to acquire file lock")?;

    let json = serde_json::to_string(tasks).context("Failed to serialize task list")?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;

    // Lock is automatically released when file is dropped
    debug!(slot = ?path, count = tasks.len(), "Wrote task list to slot");
    Ok(())
}

/// Read the full task list from the slot, applying the migration backfill
/// with `now` for records that predate the timestamp fields.
///
/// An absent slot is an empty list. A slot that exists but cannot be parsed
/// is an error; the store swallows it and starts empty.
pub fn read_slot(path: &Path, now: i64) -> Result<Vec<Task>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let data = fs::read_to_string(path).context("Failed to read slot file")?;
    let stored: Vec<StoredTask> =
        serde_json::from_str(&data).context("Failed to parse task list from slot")?;

    let tasks: Vec<Task> = stored.into_iter().map(|s| s.migrate(now)).collect();

    info!(slot = ?path, count = tasks.len(), "Restored task list from slot");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("tasks.json");

        let mut done = Task::new(2, "Ship release".to_string(), 1000);
        done.set_completed(true, 2000);
        let tasks = vec![done, Task::new(1, "Buy milk".to_string(), 500)];

        write_slot(&slot, &tasks).unwrap();
        let restored = read_slot(&slot, 9999).unwrap();
        assert_eq!(restored, tasks);
    }

    #[test]
    fn test_read_absent_slot_is_empty() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("missing.json");

        let tasks = read_slot(&slot, 0).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_read_malformed_slot_is_error() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("tasks.json");
        fs::write(&slot, "{not json").unwrap();

        assert!(read_slot(&slot, 0).is_err());
    }

    #[test]
    fn test_migration_backfills_created_at() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("tasks.json");
        fs::write(&slot, r#"[{"id":1,"text":"legacy","completed":false}]"#).unwrap();

        let tasks = read_slot(&slot, 7777).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].created_at, 7777);
        assert_eq!(tasks[0].completed_at, None);
    }

    #[test]
    fn test_migration_backfills_completed_at_when_completed() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("tasks.json");
        fs::write(
            &slot,
            r#"[{"id":1,"text":"legacy done","completed":true,"createdAt":100}]"#,
        )
        .unwrap();

        let tasks = read_slot(&slot, 7777).unwrap();
        assert_eq!(tasks[0].created_at, 100);
        assert_eq!(tasks[0].completed_at, Some(7777));
    }

    #[test]
    fn test_migration_drops_stray_completed_at() {
        // Incomplete task carrying a completion time violates the
        // coupling invariant; restore normalizes it away.
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("tasks.json");
        fs::write(
            &slot,
            r#"[{"id":1,"text":"odd","completed":false,"createdAt":100,"completedAt":200}]"#,
        )
        .unwrap();

        let tasks = read_slot(&slot, 7777).unwrap();
        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].completed_at, None);
    }

    #[test]
    fn test_write_preserves_order() {
        let temp = TempDir::new().unwrap();
        let slot = temp.path().join("tasks.json");

        let tasks = vec![
            Task::new(3, "c".to_string(), 300),
            Task::new(2, "b".to_string(), 200),
            Task::new(1, "a".to_string(), 100),
        ];
        write_slot(&slot, &tasks).unwrap();

        let restored = read_slot(&slot, 0).unwrap();
        let ids: Vec<i64> = restored.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
