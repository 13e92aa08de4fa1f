//! Project model definition and derived todo views.

use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ProjectPatch, Todo, TodoFilter};

/// A named collection of todos, usually originating from one prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque identifier
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Creation time, immutable after creation (RFC 3339 on the wire)
    pub created_at: Timestamp,

    /// Originating user request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Todos in display order
    #[serde(default)]
    pub todos: Vec<Todo>,

    /// Whole-project completion flag, independent of todo completion
    #[serde(default)]
    pub completed: bool,
}

impl Project {
    /// Creates an empty project with a fresh UUID, stamped now.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            created_at: Timestamp::now(),
            prompt: None,
            todos: Vec::new(),
            completed: false,
        }
    }

    /// Merges the fields present in `patch`. The id and creation time are
    /// never touched.
    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(prompt) = &patch.prompt {
            self.prompt = Some(prompt.clone());
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }

    /// The order hint the next appended todo should receive.
    pub fn next_order(&self) -> u32 {
        self.todos
            .iter()
            .map(|t| t.order)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Todos passing `filter`, sorted by its sort key.
    pub fn todos_matching(&self, filter: &TodoFilter) -> Vec<&Todo> {
        let mut todos: Vec<&Todo> = self.todos.iter().filter(|t| filter.matches(t)).collect();
        todos.sort_by(|a, b| filter.sort.compare(a, b));
        todos
    }

    /// Open todos whose in-project dependencies are all completed.
    ///
    /// Dependency ids that do not name a todo in this project are ignored.
    pub fn ready_todos(&self) -> Vec<&Todo> {
        let completion = self.completion_index();
        self.todos
            .iter()
            .filter(|t| !t.completed && !Self::has_open_dependency(t, &completion))
            .collect()
    }

    /// Open todos waiting on at least one open in-project dependency.
    pub fn blocked_todos(&self) -> Vec<&Todo> {
        let completion = self.completion_index();
        self.todos
            .iter()
            .filter(|t| !t.completed && Self::has_open_dependency(t, &completion))
            .collect()
    }

    fn completion_index(&self) -> HashMap<&str, bool> {
        self.todos
            .iter()
            .map(|t| (t.id.as_str(), t.completed))
            .collect()
    }

    fn has_open_dependency(todo: &Todo, completion: &HashMap<&str, bool>) -> bool {
        todo.dependencies
            .iter()
            .any(|dep| completion.get(dep.as_str()) == Some(&false))
    }
}
