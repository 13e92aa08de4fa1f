//! Todo model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::{estimate, Difficulty, Priority, TimeEstimate, TodoPatch};

/// A single actionable task inside a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Opaque identifier, stable for the todo's lifetime
    pub id: String,

    /// Short title of the task
    pub task: String,

    /// Rationale or longer description
    #[serde(default)]
    pub explanation: String,

    /// Free-text label such as "Setup" or "Testing"
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// Estimated effort; `None` when the estimate is missing or unreadable
    #[serde(default, deserialize_with = "estimate::deserialize_lenient")]
    pub time: Option<TimeEstimate>,

    /// IDs of todos that should be finished first (not validated)
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub completed: bool,

    /// Display position hint assigned at append time
    #[serde(default)]
    pub order: u32,

    /// User-owned notes, untouched by regeneration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Todo {
    /// Creates an incomplete todo with a fresh UUID and default metadata.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            task: task.into(),
            explanation: String::new(),
            category: String::new(),
            priority: Priority::default(),
            difficulty: Difficulty::default(),
            time: None,
            dependencies: Vec::new(),
            completed: false,
            order: 0,
            notes: None,
        }
    }

    /// Overwrites the fields present in `patch`, leaving identity, completion,
    /// order, and notes alone.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(task) = &patch.task {
            self.task.clone_from(task);
        }
        if let Some(explanation) = &patch.explanation {
            self.explanation.clone_from(explanation);
        }
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(dependencies) = &patch.dependencies {
            self.dependencies.clone_from(dependencies);
        }
    }
}
