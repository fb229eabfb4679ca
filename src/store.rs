//! Persistent task storage.
//!
//! `TaskStore` is an in-memory collection of tasks serialised to a single
//! JSON file. All mutation happens in memory; nothing touches disk until
//! `save` is called, which is what gives the session its commit-or-rollback
//! semantics.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::task::Task;

/// Errors produced by the todo subsystem.
#[derive(Debug, Error)]
pub enum TodoError {
    /// The referenced task id does not exist.
    #[error("task {0} not found")]
    NotFound(u64),

    /// The requested parent id does not name an existing task.
    #[error("parent task {0} does not exist")]
    InvalidParent(u64),

    /// Malformed user input, e.g. a non-numeric issue number.
    #[error("{0}")]
    Validation(String),

    #[error("todo store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("todo store is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed collection of tasks.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskStore {
    pub tasks: Vec<Task>,
}

impl TaskStore {
    /// Load a store from a JSON file. A missing file yields an empty store;
    /// an unreadable or corrupt file is an error (the session must not
    /// silently clobber existing data).
    pub fn load(path: &Path) -> Result<Self, TodoError> {
        if !path.exists() {
            return Ok(TaskStore::default());
        }
        let mut buf = String::new();
        File::open(path)?.read_to_string(&mut buf)?;
        if buf.trim().is_empty() {
            return Ok(TaskStore::default());
        }
        Ok(serde_json::from_str(&buf)?)
    }

    /// Save the store to a JSON file using an atomic-ish write
    /// (temp file + rename). The parent directory is created on demand so
    /// the first commit on a fresh install works.
    pub fn save(&self, path: &Path) -> Result<(), TodoError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = tmp_path(path);
        let data = serde_json::to_string_pretty(self)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task id.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Result<&Task, TodoError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Task, TodoError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))
    }

    /// Insert a new task. Fails when the parent id names no existing task.
    pub fn add(&mut self, description: &str, parent: Option<u64>) -> Result<Task, TodoError> {
        if let Some(p) = parent {
            if self.get(p).is_err() {
                return Err(TodoError::InvalidParent(p));
            }
        }
        let task = Task::new(self.next_id(), description, parent);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Remove a task. Its children are re-parented to the removed task's own
    /// parent, so a deleted root leaves its subtasks at top level.
    pub fn delete(&mut self, id: u64) -> Result<Task, TodoError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        let removed = self.tasks.remove(pos);
        for t in self.tasks.iter_mut() {
            if t.parent == Some(id) {
                t.parent = removed.parent;
            }
        }
        Ok(removed)
    }

    /// All tasks ordered by `(done, priority, id)`: open before done, lower
    /// priority value first, id as a stable tiebreak.
    pub fn list_ordered(&self) -> Vec<&Task> {
        let mut out: Vec<&Task> = self.tasks.iter().collect();
        out.sort_by_key(|t| t.sort_key());
        out
    }

    /// Direct children of a task, in the same order as `list_ordered`.
    pub fn children_of(&self, id: u64) -> Vec<&Task> {
        self.list_ordered()
            .into_iter()
            .filter(|t| t.parent == Some(id))
            .collect()
    }

    /// Top-level tasks, in the same order as `list_ordered`.
    pub fn roots(&self) -> Vec<&Task> {
        self.list_ordered()
            .into_iter()
            .filter(|t| t.parent.is_none())
            .collect()
    }

    /// Mark a task done.
    pub fn set_done(&mut self, id: u64) -> Result<Task, TodoError> {
        let t = self.get_mut(id)?;
        t.done = true;
        Ok(t.clone())
    }

    /// Raise a task's effective priority by decrementing its priority value.
    pub fn bump_priority(&mut self, id: u64) -> Result<Task, TodoError> {
        let t = self.get_mut(id)?;
        t.priority -= 1;
        Ok(t.clone())
    }

    /// Attach an external issue number to a task.
    pub fn set_issue_number(&mut self, id: u64, n: u64) -> Result<Task, TodoError> {
        let t = self.get_mut(id)?;
        t.issue_number = Some(n);
        Ok(t.clone())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_unique_increasing_ids_with_defaults() {
        let mut store = TaskStore::default();
        let a = store.add("buy milk", None).unwrap();
        let b = store.add("call dentist", Some(a.id)).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(b.parent, Some(1));
        for t in [&a, &b] {
            assert!(!t.done);
            assert_eq!(t.priority, 0);
            assert_eq!(t.issue_number, None);
        }
    }

    #[test]
    fn add_rejects_unknown_parent() {
        let mut store = TaskStore::default();
        let err = store.add("orphan", Some(42)).unwrap_err();
        assert!(matches!(err, TodoError::InvalidParent(42)));
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn bump_priority_strictly_decreases() {
        let mut store = TaskStore::default();
        let t = store.add("task", None).unwrap();
        let once = store.bump_priority(t.id).unwrap();
        let twice = store.bump_priority(t.id).unwrap();
        assert_eq!(once.priority, -1);
        assert_eq!(twice.priority, -2);
    }

    #[test]
    fn list_ordered_puts_done_last_and_breaks_ties_by_id() {
        let mut store = TaskStore::default();
        let a = store.add("a", None).unwrap();
        let b = store.add("b", None).unwrap();
        let c = store.add("c", None).unwrap();
        store.bump_priority(b.id).unwrap();
        store.set_done(a.id).unwrap();

        let ids: Vec<u64> = store.list_ordered().iter().map(|t| t.id).collect();
        // b has priority -1, c ties with a on priority but a is done.
        assert_eq!(ids, vec![b.id, c.id, a.id]);

        // Stable across repeated calls with no intervening mutation.
        let again: Vec<u64> = store.list_ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn more_prioritized_task_sorts_first_among_equals() {
        let mut store = TaskStore::default();
        let a = store.add("a", None).unwrap();
        let b = store.add("b", None).unwrap();
        store.bump_priority(a.id).unwrap();
        store.bump_priority(b.id).unwrap();
        store.bump_priority(b.id).unwrap();
        let ids: Vec<u64> = store.list_ordered().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn delete_reparents_children_to_grandparent() {
        let mut store = TaskStore::default();
        let root = store.add("root", None).unwrap();
        let mid = store.add("mid", Some(root.id)).unwrap();
        let leaf = store.add("leaf", Some(mid.id)).unwrap();

        store.delete(mid.id).unwrap();
        assert_eq!(store.get(leaf.id).unwrap().parent, Some(root.id));

        store.delete(root.id).unwrap();
        assert_eq!(store.get(leaf.id).unwrap().parent, None);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut store = TaskStore::default();
        assert!(matches!(store.delete(7), Err(TodoError::NotFound(7))));
    }

    #[test]
    fn next_id_skips_holes_left_by_deletes() {
        let mut store = TaskStore::default();
        let a = store.add("a", None).unwrap();
        let b = store.add("b", None).unwrap();
        store.delete(a.id).unwrap();
        let c = store.add("c", None).unwrap();
        assert_eq!(c.id, b.id + 1);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.json");

        let mut store = TaskStore::default();
        let a = store.add("persisted", None).unwrap();
        store.set_issue_number(a.id, 17).unwrap();
        store.save(&path).unwrap();

        let reloaded = TaskStore::load(&path).unwrap();
        assert_eq!(reloaded.tasks.len(), 1);
        let t = reloaded.get(a.id).unwrap();
        assert_eq!(t.description, "persisted");
        assert_eq!(t.issue_number, Some(17));
        assert!(!t.done);
        assert_eq!(t.priority, 0);
    }

    #[test]
    fn first_save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        // Default config points into a data dir that does not exist yet on
        // a fresh install.
        let path = dir.path().join("daylog-data").join("todo.json");

        let mut store = TaskStore::load(&path).unwrap();
        store.add("first task", None).unwrap();
        store.save(&path).unwrap();

        let reloaded = TaskStore::load(&path).unwrap();
        assert_eq!(reloaded.tasks.len(), 1);
    }

    #[test]
    fn load_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::load(&dir.path().join("nope.json")).unwrap();
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn load_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.json");
        std::fs::write(&path, "not json at all").unwrap();
        assert!(matches!(TaskStore::load(&path), Err(TodoError::Json(_))));
    }
}
