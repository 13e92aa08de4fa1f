//! Parameter structures for store operations.
//!
//! These structures are shared by every interface (CLI, MCP) and carry no
//! framework-specific derives beyond serde. JSON schema generation for the
//! MCP server is enabled with the `schema` feature.
//!
//! ```text
//! CLI args (clap) ─┐
//!                  ├──▶ core params ──▶ ProjectStore
//! MCP JSON (serde) ┘
//! ```
//!
//! String-typed enums (priority, difficulty, status) are validated when the
//! params are converted into their model counterparts, so both interfaces
//! report the same validation errors.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StoreError},
    models::{CompletionFilter, Difficulty, Priority, TimeEstimate, TodoFilter, TodoSort},
};

/// Generic parameters for operations requiring just a project ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the project to operate on
    pub id: String,
}

/// Parameters for operations addressing a todo by ID across all projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TodoId {
    /// The ID of the todo to operate on
    pub id: String,
}

/// Parameters for creating a new, empty project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreateProject {
    /// Name of the project (required)
    pub name: String,
    /// Optional description of the project
    pub description: Option<String>,
    /// Optional originating request
    pub prompt: Option<String>,
    /// Make the new project the active one
    #[serde(default)]
    pub select: bool,
}

/// Parameters for updating project fields. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateProject {
    /// ID of the project to update
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
    /// Whole-project completion flag
    pub completed: Option<bool>,
}

/// A todo as produced by the model-completion service, before it has an id.
///
/// Field aliases accept the generator's native names (`title`,
/// `description`, `timeEstimate`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TodoDraft {
    /// Short title of the task
    #[serde(alias = "title")]
    pub task: String,
    /// Why the task matters
    #[serde(default, alias = "description")]
    pub explanation: String,
    #[serde(default)]
    pub category: Option<String>,
    /// High, Medium or Low (defaults to Medium)
    #[serde(default)]
    pub priority: Option<String>,
    /// Easy, Medium or Hard (defaults to Medium)
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Free-text estimate such as "30" or "1h 30m"
    #[serde(default, alias = "timeEstimate")]
    pub time: Option<String>,
    /// 1-based positions of earlier todos in the same batch
    #[serde(default)]
    pub dependencies: Vec<usize>,
}

/// Validated metadata of a [`TodoDraft`].
#[derive(Debug, Clone, PartialEq)]
pub struct DraftFields {
    pub category: String,
    pub priority: Priority,
    pub difficulty: Difficulty,
    pub time: Option<TimeEstimate>,
}

impl TodoDraft {
    /// Validates the enumerated fields. A missing category becomes
    /// "General"; an unreadable estimate is dropped rather than rejected.
    ///
    /// # Errors
    ///
    /// * `StoreError::InvalidInput` - When priority or difficulty is not a
    ///   known level
    pub fn validate(&self) -> Result<DraftFields> {
        let priority = parse_level::<Priority>("priority", self.priority.as_deref())?;
        let difficulty = parse_level::<Difficulty>("difficulty", self.difficulty.as_deref())?;
        let time = self.time.as_deref().and_then(|text| {
            text.parse::<TimeEstimate>()
                .inspect_err(|e| log::debug!("Dropping estimate for '{}': {e}", self.task))
                .ok()
        });
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("General")
            .to_string();

        Ok(DraftFields {
            category,
            priority: priority.unwrap_or_default(),
            difficulty: difficulty.unwrap_or_default(),
            time,
        })
    }
}

/// Parameters for appending a generated batch of todos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct GenerateTodos {
    /// Target project; defaults to the active project, or a new one
    pub project_id: Option<String>,
    /// The goal the todos were generated from
    pub prompt: String,
    /// Generated todos in model order
    pub todos: Vec<TodoDraft>,
}

/// Parameters for replacing a todo's notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TodoNotes {
    /// ID of the todo
    pub id: String,
    /// New notes text
    pub notes: String,
}

/// Parameters for regenerating some fields of a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct RegenerateTodo {
    /// ID of the todo
    pub id: String,
    pub task: Option<String>,
    pub explanation: Option<String>,
    pub category: Option<String>,
    /// High, Medium or Low
    pub priority: Option<String>,
    /// Easy, Medium or Hard
    pub difficulty: Option<String>,
    /// Free-text estimate such as "45 min"; an empty string removes it
    pub time: Option<String>,
    /// Replacement dependency ids
    pub dependencies: Option<Vec<String>>,
}

/// Parameters for listing the todos of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ListTodos {
    /// Project to list; defaults to the active project
    pub project_id: Option<String>,
    /// "open" or "done"
    pub status: Option<String>,
    /// High, Medium or Low
    pub priority: Option<String>,
    /// Easy, Medium or Hard
    pub difficulty: Option<String>,
    /// Category name (case-insensitive)
    pub category: Option<String>,
    /// insertion, order, priority or estimate
    pub sort: Option<String>,
}

impl TryFrom<&ListTodos> for TodoFilter {
    type Error = StoreError;

    fn try_from(params: &ListTodos) -> Result<Self> {
        let completion = match params.status.as_deref().map(str::to_lowercase).as_deref() {
            None => None,
            Some("open" | "pending" | "todo") => Some(CompletionFilter::Pending),
            Some("done" | "completed") => Some(CompletionFilter::Completed),
            Some(other) => {
                return Err(StoreError::invalid_input("status")
                    .with_reason(format!("Invalid status: {other}. Use 'open' or 'done'")))
            }
        };
        let sort = params
            .sort
            .as_deref()
            .map(str::parse::<TodoSort>)
            .transpose()
            .map_err(|e| StoreError::invalid_input("sort").with_reason(e))?
            .unwrap_or_default();

        Ok(TodoFilter {
            completion,
            priority: parse_level("priority", params.priority.as_deref())?,
            difficulty: parse_level("difficulty", params.difficulty.as_deref())?,
            category: params.category.clone(),
            sort,
        })
    }
}

/// Parameters for operations on a single history entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct HistoryId {
    /// The ID of the history entry
    pub id: u64,
}

/// Parameters for searching the generation history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SearchHistory {
    /// Case-insensitive text matched against prompts, tasks and categories
    pub query: String,
}

/// Parses an optional level string, reporting the field name on failure.
pub(crate) fn parse_level<T>(field: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .map(str::parse::<T>)
        .transpose()
        .map_err(|reason| StoreError::invalid_input(field).with_reason(reason))
}
