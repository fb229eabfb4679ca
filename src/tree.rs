//! Indented tree rendering for tasks.
//!
//! Rendering is a pure projection over the store: each task becomes one line
//! (`[x]` or `[ ]`, the id, the description) indented two spaces per depth,
//! with children recursively beneath their parent in store order. A seen-id
//! set guarantees a task is rendered at most once per invocation, even when
//! it is reachable from more than one listed root.

use std::collections::HashSet;

use crate::store::TaskStore;
use crate::task::Task;

/// Render a set of root tasks (and their subtrees) as an indented tree.
pub fn render_forest(store: &TaskStore, roots: &[&Task]) -> String {
    let mut seen = HashSet::new();
    let mut out = String::new();
    for root in roots {
        render_node(store, root, 0, &mut seen, &mut out);
    }
    out
}

/// Render a single task's subtree.
pub fn render_subtree(store: &TaskStore, task: &Task) -> String {
    render_forest(store, &[task])
}

fn render_node(
    store: &TaskStore,
    task: &Task,
    depth: usize,
    seen: &mut HashSet<u64>,
    out: &mut String,
) {
    if !seen.insert(task.id) {
        return;
    }
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{}{} {} {}\n",
        indent,
        task.checkbox(),
        task.id,
        task.description
    ));
    for child in store.children_of(task.id) {
        render_node(store, child, depth + 1, seen, out);
    }
}
