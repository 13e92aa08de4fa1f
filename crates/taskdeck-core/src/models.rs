//! Data models for projects, todos, and generation history.
//!
//! This module contains the domain types held by the [`ProjectStore`] and
//! written to its durable slot. Each model implements Display (see
//! [`crate::display`]) for markdown output.
//!
//! The persisted representation uses camelCase keys (`createdAt`,
//! `activeProjectId`) so an existing blob written by earlier front ends can be
//! read unchanged.
//!
//! # Examples
//!
//! ```rust
//! use taskdeck_core::models::{Priority, Project, Todo};
//!
//! let mut project = Project::new("Launch", "Ship the first release");
//! let mut todo = Todo::new("Write changelog");
//! todo.priority = Priority::High;
//! todo.order = project.next_order();
//! project.todos.push(todo);
//!
//! assert_eq!(project.ready_todos().len(), 1);
//! assert!(format!("{project}").contains("Write changelog"));
//! ```
//!
//! [`ProjectStore`]: crate::ProjectStore

pub mod estimate;
pub mod filters;
pub mod history;
pub mod levels;
pub mod patch;
pub mod project;
pub mod summary;
pub mod todo;

#[cfg(test)]
mod tests;

pub use crate::display::LocalDateTime;
pub use estimate::TimeEstimate;
pub use filters::{CompletionFilter, TodoFilter, TodoSort};
pub use history::HistoryEntry;
pub use levels::{Difficulty, Priority};
pub use patch::{ProjectPatch, TodoPatch};
pub use project::Project;
pub use summary::ProjectSummary;
pub use todo::Todo;
