//! Messages for the outcome of create, update, and delete operations.
//!
//! Create and update results print a one-line headline followed by the full
//! resource. Delete results print only the headline, since the resource is
//! gone.

use std::fmt;

use crate::models::{HistoryEntry, Project, Todo};

/// A record that can be named in an outcome headline.
pub trait Headline: fmt::Display {
    const KIND: &'static str;

    fn headline_id(&self) -> String;
}

impl Headline for Project {
    const KIND: &'static str = "project";

    fn headline_id(&self) -> String {
        self.id.clone()
    }
}

impl Headline for Todo {
    const KIND: &'static str = "todo";

    fn headline_id(&self) -> String {
        self.id.clone()
    }
}

/// A newly created record.
///
/// ```rust
/// use taskdeck_core::{display::CreateResult, models::Project};
///
/// let project = Project::new("New Project", "A newly created project");
/// let output = CreateResult::new(project.clone()).to_string();
/// assert!(output.starts_with(&format!("Created project with ID: {}", project.id)));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Headline> fmt::Display for CreateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} with ID: {}\n", T::KIND, self.resource.headline_id())?;
        write!(f, "{}", self.resource)
    }
}

/// An updated record and the list of changes applied to it.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: Headline> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} with ID: {}\n", T::KIND, self.resource.headline_id())?;
        if !self.changes.is_empty() {
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
            writeln!(f)?;
        }
        write!(f, "{}", self.resource)
    }
}

/// A removed record.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Project> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Project { id, name, todos, .. } = &self.resource;
        writeln!(f, "Removed project '{name}' (ID: {id}) and its {} todos.", todos.len())
    }
}

impl fmt::Display for DeleteResult<HistoryEntry> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let HistoryEntry { id, name, .. } = &self.resource;
        writeln!(f, "Removed history entry {id} ({name}).")
    }
}

/// A one-line success or failure notice.
///
/// ```rust
/// use taskdeck_core::display::OperationStatus;
///
/// let status = OperationStatus::success("Toggled 1 todo".to_string());
/// assert_eq!(status.to_string(), "✓ Toggled 1 todo\n");
/// ```
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = if self.success { '✓' } else { '✗' };
        writeln!(f, "{icon} {}", self.message)
    }
}
