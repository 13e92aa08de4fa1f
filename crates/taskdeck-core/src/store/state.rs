//! The serializable store state and the operations over it.
//!
//! Everything here is pure in-memory work; [`super::ProjectStore`] wraps it
//! and writes the result to the durable slot.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StoreError},
    models::{Project, ProjectPatch, ProjectSummary, Todo, TodoPatch},
    params::{CreateProject, GenerateTodos},
};

pub(crate) const DEFAULT_PROJECT_NAME: &str = "My First Project";
pub(crate) const DEFAULT_PROJECT_DESCRIPTION: &str = "Default project for your todos";
pub(crate) const DEFAULT_PROJECT_PROMPT: &str = "Default project";
pub(crate) const GENERATED_PROJECT_NAME: &str = "Generated Project";
pub(crate) const GENERATED_PROJECT_DESCRIPTION: &str = "Project generated from prompt";

/// Every project plus the active-project pointer.
///
/// Serializes as `{"projects": [...], "activeProjectId": "..." | null}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub active_project_id: Option<String>,
}

/// Outcome of [`StoreState::append_generated`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedBatch {
    pub project_id: String,
    /// Whether a new project had to be created for the batch
    pub created_project: bool,
    pub todos: Vec<Todo>,
}

impl StoreState {
    pub fn from_json(blob: &str) -> Result<Self> {
        Ok(serde_json::from_str(blob)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Inserts `project`, or replaces the record with the same id in place.
    /// Returns `true` when an existing record was replaced.
    pub fn add_project(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                *existing = project;
                true
            }
            None => {
                self.projects.push(project);
                false
            }
        }
    }

    pub fn update_project(&mut self, id: &str, patch: &ProjectPatch) -> Result<&Project> {
        let project = self
            .project_mut(id)
            .ok_or_else(|| StoreError::project_not_found(id))?;
        project.apply(patch);
        Ok(project)
    }

    /// Points the active pointer at `id` without checking that it exists.
    pub fn set_active_project(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.get_project(&id).is_none() {
            debug!("Selecting unknown project '{id}'");
        }
        self.active_project_id = Some(id);
    }

    pub fn get_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// The project named by the active pointer, if it exists.
    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id
            .as_deref()
            .and_then(|id| self.get_project(id))
    }

    /// First todo with `todo_id`, in project order then todo order.
    pub fn get_todo_by_id(&self, todo_id: &str) -> Option<&Todo> {
        self.projects
            .iter()
            .flat_map(|p| p.todos.iter())
            .find(|t| t.id == todo_id)
    }

    /// Ids of every project holding a todo with `todo_id`.
    pub fn todo_owners(&self, todo_id: &str) -> Vec<&str> {
        self.projects
            .iter()
            .filter(|p| p.todos.iter().any(|t| t.id == todo_id))
            .map(|p| p.id.as_str())
            .collect()
    }

    /// Applies `f` to every todo with `todo_id` in every project.
    fn for_each_todo(&mut self, todo_id: &str, mut f: impl FnMut(&mut Todo)) -> Result<usize> {
        let mut touched = 0;
        for todo in self
            .projects
            .iter_mut()
            .flat_map(|p| p.todos.iter_mut())
            .filter(|t| t.id == todo_id)
        {
            f(todo);
            touched += 1;
        }

        if touched == 0 {
            return Err(StoreError::todo_not_found(todo_id));
        }
        Ok(touched)
    }

    pub fn toggle_todo_completed(&mut self, todo_id: &str) -> Result<usize> {
        self.for_each_todo(todo_id, |todo| todo.completed = !todo.completed)
    }

    /// Blank notes are stored as no notes.
    pub fn update_todo_notes(&mut self, todo_id: &str, notes: &str) -> Result<usize> {
        let notes = (!notes.trim().is_empty()).then(|| notes.to_string());
        self.for_each_todo(todo_id, |todo| todo.notes.clone_from(&notes))
    }

    pub fn regenerate_todo(&mut self, todo_id: &str, patch: &TodoPatch) -> Result<usize> {
        self.for_each_todo(todo_id, |todo| todo.apply(patch))
    }

    /// Creates an empty project from `params`, selecting it when asked.
    pub fn create_project(&mut self, params: &CreateProject) -> Result<Project> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid_input("name").with_reason("Project name cannot be empty"));
        }

        let mut project = Project::new(name, params.description.clone().unwrap_or_default());
        project.prompt.clone_from(&params.prompt);
        self.projects.push(project.clone());
        if params.select {
            self.active_project_id = Some(project.id.clone());
        }
        Ok(project)
    }

    /// Creates and selects the default project when the store is empty.
    /// Returns `true` if it did.
    pub fn ensure_default_project(&mut self) -> bool {
        if !self.projects.is_empty() {
            return false;
        }

        let mut project = Project::new(DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_DESCRIPTION);
        project.prompt = Some(DEFAULT_PROJECT_PROMPT.to_string());
        self.active_project_id = Some(project.id.clone());
        self.projects.push(project);
        true
    }

    /// Appends a generated batch to its target project.
    ///
    /// The target is `batch.project_id`, else the active project. Without
    /// either a "Generated Project" is created and selected. Draft
    /// dependencies are 1-based batch positions and are rewritten to the new
    /// todo ids; positions outside the batch and self-references are dropped.
    ///
    /// # Errors
    ///
    /// * `StoreError::ProjectNotFound` - When `batch.project_id` names no project
    /// * `StoreError::InvalidInput` - When the batch is empty or a draft is invalid
    ///
    /// Nothing is changed when an error is returned.
    pub fn append_generated(&mut self, batch: &GenerateTodos) -> Result<GeneratedBatch> {
        if batch.todos.is_empty() {
            return Err(StoreError::invalid_input("todos")
                .with_reason("At least one todo is required"));
        }
        if let Some(id) = &batch.project_id {
            if self.get_project(id).is_none() {
                return Err(StoreError::project_not_found(id.as_str()));
            }
        }

        let fields = batch
            .todos
            .iter()
            .enumerate()
            .map(|(i, draft)| {
                if draft.task.trim().is_empty() {
                    return Err(StoreError::invalid_input("task")
                        .with_reason(format!("Todo {} has an empty task", i + 1)));
                }
                draft.validate()
            })
            .collect::<Result<Vec<_>>>()?;

        let target_id = batch
            .project_id
            .clone()
            .or_else(|| self.active_project().map(|p| p.id.clone()));
        let prompt = Some(batch.prompt.trim())
            .filter(|p| !p.is_empty())
            .map(String::from);

        let (project, created_project) = match target_id.and_then(|id| {
            self.projects.iter().position(|p| p.id == id)
        }) {
            Some(index) => (&mut self.projects[index], false),
            None => {
                let mut project =
                    Project::new(GENERATED_PROJECT_NAME, GENERATED_PROJECT_DESCRIPTION);
                project.prompt.clone_from(&prompt);
                self.active_project_id = Some(project.id.clone());
                self.projects.push(project);
                let last = self.projects.len() - 1;
                (&mut self.projects[last], true)
            }
        };

        if project.prompt.is_none() {
            project.prompt = prompt;
        }

        let ids: Vec<String> = batch
            .todos
            .iter()
            .map(|_| uuid::Uuid::new_v4().to_string())
            .collect();
        let first_order = project.next_order();

        let todos: Vec<Todo> = batch
            .todos
            .iter()
            .zip(fields)
            .enumerate()
            .map(|(index, (draft, fields))| {
                let mut dependencies: Vec<String> = Vec::new();
                for &position in &draft.dependencies {
                    if position == 0 || position > ids.len() || position - 1 == index {
                        debug!("Dropping dependency {position} of batch todo {}", index + 1);
                        continue;
                    }
                    let dep = &ids[position - 1];
                    if !dependencies.contains(dep) {
                        dependencies.push(dep.clone());
                    }
                }

                Todo {
                    id: ids[index].clone(),
                    task: draft.task.trim().to_string(),
                    explanation: draft.explanation.clone(),
                    category: fields.category,
                    priority: fields.priority,
                    difficulty: fields.difficulty,
                    time: fields.time,
                    dependencies,
                    completed: false,
                    order: first_order.saturating_add(index as u32),
                    notes: None,
                }
            })
            .collect();

        project.todos.extend(todos.iter().cloned());

        Ok(GeneratedBatch {
            project_id: project.id.clone(),
            created_project,
            todos,
        })
    }

    /// Removes a project, clearing the active pointer if it named it.
    pub fn remove_project(&mut self, id: &str) -> Result<Project> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::project_not_found(id))?;

        if self.active_project_id.as_deref() == Some(id) {
            self.active_project_id = None;
        }
        Ok(self.projects.remove(index))
    }

    /// Removes every todo with `todo_id` and drops it from the dependency
    /// lists of the remaining todos in those projects. Order hints of the
    /// remaining todos are kept.
    pub fn remove_todo(&mut self, todo_id: &str) -> Result<usize> {
        let mut removed = 0;
        for project in &mut self.projects {
            let before = project.todos.len();
            project.todos.retain(|t| t.id != todo_id);
            let count = before - project.todos.len();
            if count > 0 {
                removed += count;
                for todo in &mut project.todos {
                    todo.dependencies.retain(|dep| dep != todo_id);
                }
            }
        }

        if removed == 0 {
            return Err(StoreError::todo_not_found(todo_id));
        }
        Ok(removed)
    }

    /// One summary per project, in store order.
    pub fn summaries(&self) -> Vec<ProjectSummary> {
        let active = self.active_project_id.as_deref();
        self.projects
            .iter()
            .map(|p| ProjectSummary::from_project(p, active))
            .collect()
    }

    /// Pretty JSON of one project, as handed to a conversational assistant.
    pub fn assistant_context(&self, project_id: &str) -> Result<String> {
        let project = self
            .get_project(project_id)
            .ok_or_else(|| StoreError::project_not_found(project_id))?;
        Ok(serde_json::to_string_pretty(project)?)
    }
}
