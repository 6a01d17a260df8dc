// TaskStore: owns the task list, enforces its invariants, and keeps the
// persisted slot in sync

use eyre::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::filter::FilterMode;
use crate::slot;
use crate::task::{Task, now_ms};

/// Owning component for the task list.
///
/// Constructed once at startup via [`TaskStore::open`], which restores the
/// list from the slot file. Every mutation rewrites the slot wholesale.
/// Mutations are total: unknown ids and empty text are no-ops, and a failed
/// slot write is logged rather than surfaced.
pub struct TaskStore {
    slot_path: PathBuf,
    tasks: Vec<Task>,
    filter: FilterMode,
    last_id: i64,
}

impl TaskStore {
    /// Open a store backed by the given slot file, restoring any persisted
    /// list. A missing slot starts empty; a slot that exists but cannot be
    /// parsed also starts empty, with the failure logged.
    pub fn open<P: AsRef<Path>>(slot_path: P) -> Result<Self> {
        let slot_path = slot_path.as_ref().to_path_buf();

        if let Some(parent) = slot_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let tasks = match slot::read_slot(&slot_path, now_ms()) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(slot = ?slot_path, error = ?e, "Failed to restore tasks, starting empty");
                Vec::new()
            }
        };

        // Seed the id generator past every restored id so new ids never
        // collide with old ones.
        let last_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);

        Ok(Self {
            slot_path,
            tasks,
            filter: FilterMode::default(),
            last_id,
        })
    }

    /// Path of the slot file backing this store
    pub fn slot_path(&self) -> &Path {
        &self.slot_path
    }

    /// Full list, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current filter mode for the consumer's view
    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    /// Switch the view's filter mode. Not a list mutation; the slot is
    /// untouched.
    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter = mode;
    }

    /// Tasks visible under the current filter mode, order preserved
    pub fn filtered(&self) -> Vec<&Task> {
        self.filtered_by(self.filter)
    }

    /// Tasks visible under an explicit filter mode, order preserved
    pub fn filtered_by(&self, mode: FilterMode) -> Vec<&Task> {
        self.tasks.iter().filter(|t| mode.matches(t)).collect()
    }

    /// Add a task with the trimmed text, prepending it to the list.
    /// Whitespace-only text is a no-op. Returns the new task's id.
    pub fn add(&mut self, text: &str) -> Option<i64> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let now = now_ms();
        let id = self.next_id(now);
        self.tasks.insert(0, Task::new(id, text.to_string(), now));
        debug!(id, "Added task");

        self.persist();
        Some(id)
    }

    /// Flip a task's completed flag, setting or clearing its completion
    /// time. Unknown id is a no-op.
    pub fn toggle_complete(&mut self, id: i64) {
        let now = now_ms();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };

        let completed = !task.completed;
        task.set_completed(completed, now);
        debug!(id, completed, "Toggled task");

        self.persist();
    }

    /// Remove a task. Unknown id is a no-op.
    pub fn delete(&mut self, id: i64) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return;
        }
        debug!(id, "Deleted task");

        self.persist();
    }

    /// Replace a task's text, leaving completion state untouched. Trimmed-
    /// empty text deletes the task instead. Unknown id is a no-op.
    pub fn edit_text(&mut self, id: i64, new_text: &str) {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            self.delete(id);
            return;
        }

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.text = new_text.to_string();
        debug!(id, "Edited task text");

        self.persist();
    }

    /// Bulk-toggle the visible subset: if every visible task is already
    /// completed, all become incomplete; otherwise all become completed.
    /// Tasks outside `visible_ids` are untouched. An empty subset is a
    /// no-op.
    pub fn select_all(&mut self, visible_ids: &[i64]) {
        let all_completed = self
            .tasks
            .iter()
            .filter(|t| visible_ids.contains(&t.id))
            .all(|t| t.completed);
        let now = now_ms();

        let mut changed = false;
        for task in self.tasks.iter_mut() {
            if visible_ids.contains(&task.id) {
                task.set_completed(!all_completed, now);
                changed = true;
            }
        }
        if !changed {
            return;
        }
        debug!(
            count = visible_ids.len(),
            completed = !all_completed,
            "Bulk-toggled visible tasks"
        );

        self.persist();
    }

    /// Remove every completed task, preserving the order of the rest
    pub fn clear_completed(&mut self) {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        if self.tasks.len() == before {
            return;
        }
        debug!(removed = before - self.tasks.len(), "Cleared completed tasks");

        self.persist();
    }

    /// Fresh unique id: wall-clock milliseconds, bumped past the last
    /// issued id so two tasks created in the same millisecond never
    /// collide.
    fn next_id(&mut self, now: i64) -> i64 {
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    fn persist(&self) {
        if let Err(e) = slot::write_slot(&self.slot_path, &self.tasks) {
            warn!(slot = ?self.slot_path, error = ?e, "Failed to persist task list");
        }
    }
}
