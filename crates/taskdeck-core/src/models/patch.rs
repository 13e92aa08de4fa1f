//! Partial-update types for projects and todos.

use super::{Difficulty, Priority, TimeEstimate};
use crate::params::parse_level;

/// Fields to merge into an existing project. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    pub completed: Option<bool>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Human-readable list of what this patch changes.
    pub fn describe(&self) -> Vec<String> {
        let mut changes = Vec::new();
        if self.name.is_some() {
            changes.push("Updated name".to_string());
        }
        if self.description.is_some() {
            changes.push("Updated description".to_string());
        }
        if self.prompt.is_some() {
            changes.push("Updated prompt".to_string());
        }
        if let Some(completed) = self.completed {
            changes.push(format!("Marked {}", if completed { "completed" } else { "open" }));
        }
        changes
    }
}

impl From<crate::params::UpdateProject> for ProjectPatch {
    fn from(params: crate::params::UpdateProject) -> Self {
        Self {
            name: params.name,
            description: params.description,
            prompt: params.prompt,
            completed: params.completed,
        }
    }
}

/// Fields a regeneration may overwrite on a todo.
///
/// Identity, completion, order, and notes are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub explanation: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub difficulty: Option<Difficulty>,
    /// `Some(None)` removes the estimate
    pub time: Option<Option<TimeEstimate>>,
    pub dependencies: Option<Vec<String>>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn describe(&self) -> Vec<String> {
        [
            (self.task.is_some(), "task"),
            (self.explanation.is_some(), "explanation"),
            (self.category.is_some(), "category"),
            (self.priority.is_some(), "priority"),
            (self.difficulty.is_some(), "difficulty"),
            (self.time.is_some(), "time estimate"),
            (self.dependencies.is_some(), "dependencies"),
        ]
        .into_iter()
        .filter(|(changed, _)| *changed)
        .map(|(_, field)| format!("Updated {field}"))
        .collect()
    }
}

impl TryFrom<crate::params::RegenerateTodo> for TodoPatch {
    type Error = crate::StoreError;

    /// Convert regeneration parameters into a validated patch.
    ///
    /// # Errors
    ///
    /// * `StoreError::InvalidInput` - When priority, difficulty, or time
    ///   cannot be parsed
    ///
    /// A blank time clears the estimate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use taskdeck_core::{models::{Priority, TodoPatch}, params::RegenerateTodo};
    ///
    /// let params = RegenerateTodo {
    ///     id: "t1".to_string(),
    ///     task: Some("Write integration tests".to_string()),
    ///     priority: Some("high".to_string()),
    ///     time: Some("1h 30m".to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// let patch: TodoPatch = params.try_into()?;
    /// assert_eq!(patch.priority, Some(Priority::High));
    /// assert_eq!(patch.time.flatten().map(|t| t.minutes()), Some(90));
    /// # Ok::<(), taskdeck_core::StoreError>(())
    /// ```
    fn try_from(params: crate::params::RegenerateTodo) -> Result<Self, Self::Error> {
        let time = match params.time.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(text) => Some(Some(text.parse::<TimeEstimate>().map_err(|reason| {
                crate::StoreError::invalid_input("time").with_reason(reason)
            })?)),
        };

        Ok(Self {
            task: params.task,
            explanation: params.explanation,
            category: params.category,
            priority: parse_level("priority", params.priority.as_deref())?,
            difficulty: parse_level("difficulty", params.difficulty.as_deref())?,
            time,
            dependencies: params.dependencies,
        })
    }
}
