//! Task data structure for the todo list.
//!
//! This module defines the core `Task` struct: a single unit of work with an
//! optional parent link, a completion flag, a priority, and an optional
//! cross-reference to an external issue tracker.

use serde::{Deserialize, Serialize};

/// A unit of work in the hierarchical todo list.
///
/// Tasks form a forest: `parent` points at another task's id, or is `None`
/// for top-level tasks. Priority is a signed integer where lower values sort
/// earlier; each "prioritize" decrements it, so a repeatedly prioritized task
/// keeps climbing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub parent: Option<u64>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub priority: i64,
    pub issue_number: Option<u64>,
}

impl Task {
    /// Create a fresh task. New tasks always start open with priority 0.
    pub fn new(id: u64, description: &str, parent: Option<u64>) -> Self {
        Task {
            id,
            description: description.to_string(),
            parent,
            done: false,
            priority: 0,
            issue_number: None,
        }
    }

    /// Checkbox marker used by the tree renderer.
    pub fn checkbox(&self) -> &'static str {
        if self.done {
            "[x]"
        } else {
            "[ ]"
        }
    }

    /// Sort key shared by the flat listing and sibling ordering:
    /// open tasks first, then ascending priority, then id as a stable tiebreak.
    pub fn sort_key(&self) -> (bool, i64, u64) {
        (self.done, self.priority, self.id)
    }
}
