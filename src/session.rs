//! Transactional session over the task store.
//!
//! A `TodoSession` scopes one open-to-close cycle against a backing file.
//! Opening loads the store into memory; every mutation happens in memory and
//! is only written out by an explicit `commit` or by `close`. Dropping a
//! session without closing it rolls back everything uncommitted, which is
//! exactly what the interrupt path wants.

use std::path::{Path, PathBuf};

use crate::store::{TaskStore, TodoError};
use crate::task::Task;
use crate::tree;

/// One unit of transactional work over a todo backing file.
#[derive(Debug)]
pub struct TodoSession {
    path: PathBuf,
    store: TaskStore,
}

impl TodoSession {
    /// Open a session against the given backing file. A missing file starts
    /// an empty list; a corrupt or unreadable file is an error.
    pub fn open(path: &Path) -> Result<Self, TodoError> {
        Ok(TodoSession {
            path: path.to_path_buf(),
            store: TaskStore::load(path)?,
        })
    }

    /// Add a new task, optionally as a subtask of `parent`.
    pub fn add_task(&mut self, description: &str, parent: Option<u64>) -> Result<Task, TodoError> {
        self.store.add(description, parent)
    }

    /// Mark a task done.
    pub fn mark_done(&mut self, id: u64) -> Result<Task, TodoError> {
        self.store.set_done(id)
    }

    /// Raise a task's priority. The stored priority value strictly decreases.
    pub fn prioritize(&mut self, id: u64) -> Result<Task, TodoError> {
        self.store.bump_priority(id)
    }

    /// Attach an external issue number. The trailing input must parse as a
    /// non-negative integer; otherwise nothing is mutated.
    pub fn set_issue_number(&mut self, id: u64, text: &str) -> Result<Task, TodoError> {
        let n: u64 = text
            .trim()
            .parse()
            .map_err(|_| TodoError::Validation(format!("not an issue number: {text:?}")))?;
        self.store.set_issue_number(id, n)
    }

    /// Delete a task. Children are re-parented to the deleted task's parent.
    pub fn delete_task(&mut self, id: u64) -> Result<Task, TodoError> {
        self.store.delete(id)
    }

    /// Look up a task without rendering it.
    pub fn task(&self, id: u64) -> Result<&Task, TodoError> {
        self.store.get(id)
    }

    /// Render one task's subtree, or the forest of all top-level tasks when
    /// no id is given.
    pub fn show_task(&self, id: Option<u64>) -> Result<String, TodoError> {
        match id {
            Some(id) => {
                let task = self.store.get(id)?;
                Ok(tree::render_subtree(&self.store, task))
            }
            None => Ok(tree::render_forest(&self.store, &self.store.roots())),
        }
    }

    /// Flush pending mutations to the backing file without closing the
    /// session. The interactive loop calls this after every mutation.
    pub fn commit(&self) -> Result<(), TodoError> {
        self.store.save(&self.path)
    }

    /// Commit and consume the session. Dropping a session without calling
    /// `close` discards uncommitted mutations instead.
    pub fn close(self) -> Result<(), TodoError> {
        self.commit()
    }
}
