//! Generation history records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::Todo;

/// A timestamped copy of one generation: the prompt and the todos it produced.
///
/// History is independent of the project store; entries are copied once at
/// generation time and never synchronised afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    pub prompt: String,
    /// Short label: leading prompt words plus a timestamp
    pub name: String,
    pub description: String,
    pub todos: Vec<Todo>,
    /// Distinct todo categories in first-seen order
    pub tags: Vec<String>,
    pub created_at: Timestamp,
}

impl HistoryEntry {
    /// Case-insensitive match against the prompt and every todo's task and
    /// category.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if self.prompt.to_lowercase().contains(&needle) {
            return true;
        }
        self.todos.iter().any(|todo| {
            todo.task.to_lowercase().contains(&needle)
                || todo.category.to_lowercase().contains(&needle)
        })
    }
}

/// Distinct categories of `todos`, keeping first-seen order.
pub fn derive_tags(todos: &[Todo]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for todo in todos {
        if !tags.contains(&todo.category) {
            tags.push(todo.category.clone());
        }
    }
    tags
}
