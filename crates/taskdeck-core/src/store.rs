//! The project/todo store and its persistence.
//!
//! [`ProjectStore`] owns a [`StoreState`] and a [`SlotStorage`] backend. Reads
//! go straight to the in-memory state. Every successful mutation writes the
//! whole state to the slot as JSON; a failed write is logged, the store is
//! marked dirty, and [`ProjectStore::flush`] reports it.
//!
//! ```rust
//! use taskdeck_core::{ProjectStoreBuilder, params::{GenerateTodos, TodoDraft}};
//!
//! # fn main() -> taskdeck_core::Result<()> {
//! let mut store = ProjectStoreBuilder::new().in_memory().build()?;
//! store.ensure_default_project();
//!
//! let batch = GenerateTodos {
//!     project_id: None,
//!     prompt: "Plan a picnic".to_string(),
//!     todos: vec![
//!         TodoDraft { task: "Pick a park".to_string(), ..Default::default() },
//!         TodoDraft {
//!             task: "Pack food".to_string(),
//!             dependencies: vec![1],
//!             ..Default::default()
//!         },
//!     ],
//! };
//! let generated = store.append_generated(&batch)?;
//! let project = store.get_project(&generated.project_id).expect("project exists");
//! assert_eq!(project.ready_todos().len(), 1);
//!
//! store.toggle_todo_completed(&generated.todos[0].id)?;
//! let project = store.get_project(&generated.project_id).expect("project exists");
//! assert_eq!(project.ready_todos()[0].task, "Pack food");
//! # Ok(())
//! # }
//! ```

use log::{debug, warn};

use crate::{
    error::Result,
    models::{Project, ProjectPatch, ProjectSummary, Todo, TodoPatch},
    params::{CreateProject, GenerateTodos},
    slot::SlotStorage,
};

mod builder;
mod state;

#[cfg(test)]
mod tests;

pub use builder::{
    default_database_path, prepare_database_path, ProjectStoreBuilder, DEFAULT_SLOT_NAME,
};
pub use state::{GeneratedBatch, StoreState};

/// Single source of truth for project and todo state.
pub struct ProjectStore {
    state: StoreState,
    slot: Box<dyn SlotStorage>,
    slot_name: String,
    dirty: bool,
}

impl ProjectStore {
    /// Creates a store over `slot`, rehydrating from it.
    pub(crate) fn new(slot: Box<dyn SlotStorage>, slot_name: String) -> Self {
        let mut store = Self {
            state: StoreState::default(),
            slot,
            slot_name,
            dirty: false,
        };
        store.reload();
        store
    }

    /// Replaces the in-memory state with the slot contents. A missing or
    /// unreadable slot yields an empty state, so this is only safe before
    /// anything has been loaded. Use [`ProjectStore::refresh`] afterwards.
    pub fn reload(&mut self) {
        self.state = match self.slot.load(&self.slot_name) {
            Ok(Some(blob)) => StoreState::from_json(&blob).unwrap_or_else(|e| {
                warn!("Discarding unreadable slot '{}': {e}", self.slot_name);
                StoreState::default()
            }),
            Ok(None) => {
                debug!("Slot '{}' is empty, starting fresh", self.slot_name);
                StoreState::default()
            }
            Err(e) => {
                warn!("Failed to read slot '{}': {e}", self.slot_name);
                StoreState::default()
            }
        };
        self.dirty = false;
    }

    /// Picks up changes other writers made to the slot.
    ///
    /// Unlike [`ProjectStore::reload`], a failed read or a corrupt blob keeps
    /// the current state; the next mutation would otherwise overwrite the
    /// slot with nothing. An emptied slot is taken as is. A dirty store is
    /// left alone until its pending write succeeds.
    pub fn refresh(&mut self) {
        if self.dirty {
            debug!(
                "Skipping refresh of slot '{}' with unsaved changes",
                self.slot_name
            );
            return;
        }

        match self.slot.load(&self.slot_name) {
            Ok(Some(blob)) => match StoreState::from_json(&blob) {
                Ok(state) => self.state = state,
                Err(e) => warn!(
                    "Keeping current state, slot '{}' is unreadable: {e}",
                    self.slot_name
                ),
            },
            Ok(None) => self.state = StoreState::default(),
            Err(e) => warn!(
                "Keeping current state, failed to read slot '{}': {e}",
                self.slot_name
            ),
        }
    }

    fn persist(&mut self) {
        match self.write_slot() {
            Ok(()) => self.dirty = false,
            Err(e) => {
                warn!("Failed to persist slot '{}': {e}", self.slot_name);
                self.dirty = true;
            }
        }
    }

    fn write_slot(&self) -> Result<()> {
        let blob = self.state.to_json()?;
        self.slot.save(&self.slot_name, &blob)?;
        debug!(
            "Persisted {} projects to slot '{}'",
            self.state.projects.len(),
            self.slot_name
        );
        Ok(())
    }

    /// Retries a failed write. A no-op when the slot is up to date.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.write_slot()?;
            self.dirty = false;
        }
        Ok(())
    }

    /// Whether the last write to the slot failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn slot_name(&self) -> &str {
        &self.slot_name
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn projects(&self) -> &[Project] {
        &self.state.projects
    }

    pub fn active_project_id(&self) -> Option<&str> {
        self.state.active_project_id.as_deref()
    }

    /// Inserts or replaces a project by id. Returns `true` on replacement.
    pub fn add_project(&mut self, project: Project) -> bool {
        let replaced = self.state.add_project(project);
        self.persist();
        replaced
    }

    /// Merges `patch` into a project.
    ///
    /// # Errors
    ///
    /// * `StoreError::ProjectNotFound` - When no project has the given id
    pub fn update_project(&mut self, id: &str, patch: &ProjectPatch) -> Result<Project> {
        let project = self.state.update_project(id, patch)?.clone();
        self.persist();
        Ok(project)
    }

    pub fn set_active_project(&mut self, id: impl Into<String>) {
        self.state.set_active_project(id);
        self.persist();
    }

    /// Flips completion of every todo with this id. Returns the match count.
    pub fn toggle_todo_completed(&mut self, todo_id: &str) -> Result<usize> {
        let touched = self.state.toggle_todo_completed(todo_id)?;
        self.persist();
        Ok(touched)
    }

    pub fn get_todo_by_id(&self, todo_id: &str) -> Option<&Todo> {
        self.state.get_todo_by_id(todo_id)
    }

    /// Sets the notes of every todo with this id. Returns the match count.
    pub fn update_todo_notes(&mut self, todo_id: &str, notes: &str) -> Result<usize> {
        let touched = self.state.update_todo_notes(todo_id, notes)?;
        self.persist();
        Ok(touched)
    }

    /// Merges `patch` into every todo with this id. Returns the match count.
    pub fn regenerate_todo(&mut self, todo_id: &str, patch: &TodoPatch) -> Result<usize> {
        let touched = self.state.regenerate_todo(todo_id, patch)?;
        self.persist();
        Ok(touched)
    }

    pub fn get_project(&self, id: &str) -> Option<&Project> {
        self.state.get_project(id)
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.state.active_project()
    }

    pub fn create_project(&mut self, params: &CreateProject) -> Result<Project> {
        let project = self.state.create_project(params)?;
        self.persist();
        Ok(project)
    }

    /// Creates and selects the default project if there are no projects.
    pub fn ensure_default_project(&mut self) -> bool {
        let created = self.state.ensure_default_project();
        if created {
            self.persist();
        }
        created
    }

    pub fn append_generated(&mut self, batch: &GenerateTodos) -> Result<GeneratedBatch> {
        let generated = self.state.append_generated(batch)?;
        self.persist();
        Ok(generated)
    }

    pub fn remove_project(&mut self, id: &str) -> Result<Project> {
        let removed = self.state.remove_project(id)?;
        self.persist();
        Ok(removed)
    }

    pub fn remove_todo(&mut self, todo_id: &str) -> Result<usize> {
        let removed = self.state.remove_todo(todo_id)?;
        self.persist();
        Ok(removed)
    }

    pub fn todo_owners(&self, todo_id: &str) -> Vec<&str> {
        self.state.todo_owners(todo_id)
    }

    pub fn summaries(&self) -> Vec<ProjectSummary> {
        self.state.summaries()
    }

    pub fn assistant_context(&self, project_id: &str) -> Result<String> {
        self.state.assistant_context(project_id)
    }
}
