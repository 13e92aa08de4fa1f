//! Project summary types and functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{estimate::total_minutes, Project};

/// Summary information about a project with todo statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    /// Whole-project completion flag
    pub completed: bool,
    /// Whether this is the active project
    pub active: bool,
    pub total_todos: u32,
    pub completed_todos: u32,
    pub pending_todos: u32,
    /// Sum of all todo estimates in minutes
    pub estimated_minutes: u64,
    /// Sum of estimates of todos not yet completed
    pub remaining_minutes: u64,
}

impl ProjectSummary {
    /// Summarise `project`, flagging it active when its id matches.
    pub fn from_project(project: &Project, active_id: Option<&str>) -> Self {
        let total_todos = project.todos.len() as u32;
        let completed_todos = project.completed_count() as u32;

        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            created_at: project.created_at,
            completed: project.completed,
            active: active_id == Some(project.id.as_str()),
            total_todos,
            completed_todos,
            pending_todos: total_todos - completed_todos,
            estimated_minutes: total_minutes(project.todos.iter().filter_map(|t| t.time.as_ref())),
            remaining_minutes: total_minutes(
                project
                    .todos
                    .iter()
                    .filter(|t| !t.completed)
                    .filter_map(|t| t.time.as_ref()),
            ),
        }
    }
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self::from_project(project, None)
    }
}
