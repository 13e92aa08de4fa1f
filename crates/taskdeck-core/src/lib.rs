//! Core library for the taskdeck project and todo manager.
//!
//! This crate provides the project/todo store, its durable slot persistence,
//! the generation history log, and markdown display formatting.
//!
//! # Architecture
//!
//! - [`store`]: [`ProjectStore`] holds every project and the active-project
//!   pointer. Mutations are synchronous and write the whole state to a
//!   [`slot`] afterwards.
//! - [`slot`]: named durable blobs in SQLite ([`SqliteSlot`]) or memory
//!   ([`MemorySlot`]).
//! - [`history`]: a local log of generated batches, independent of the store.
//! - [`models`] and [`params`]: domain types and the operation inputs shared
//!   by the CLI and the MCP server.
//! - [`display`]: markdown `Display` implementations and wrappers.
//!
//! # Quick Start
//!
//! ```rust
//! use taskdeck_core::{ProjectStoreBuilder, params::CreateProject};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = ProjectStoreBuilder::new().in_memory().build()?;
//!
//! let project = store.create_project(&CreateProject {
//!     name: "Website relaunch".to_string(),
//!     description: Some("New landing page".to_string()),
//!     prompt: None,
//!     select: true,
//! })?;
//!
//! assert_eq!(store.active_project_id(), Some(project.id.as_str()));
//! for summary in store.summaries() {
//!     println!("{summary}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod history;
pub mod models;
pub mod params;
pub mod slot;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, HistoryList, OperationStatus, ProjectList, TodoList, UpdateResult,
};
pub use error::{Result, StoreError};
pub use history::HistoryLog;
pub use models::{
    Difficulty, HistoryEntry, LocalDateTime, Priority, Project, ProjectPatch, ProjectSummary,
    TimeEstimate, Todo, TodoFilter, TodoPatch,
};
pub use params::{
    CreateProject, GenerateTodos, Id, ListTodos, RegenerateTodo, TodoDraft, TodoId, TodoNotes,
    UpdateProject,
};
pub use slot::{MemorySlot, SlotStorage, SqliteSlot};
pub use store::{GeneratedBatch, ProjectStore, ProjectStoreBuilder, StoreState};
