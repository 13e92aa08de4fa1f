//! Display formatting for terminal and MCP output.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]).
//! Collections and operation outcomes go through small wrapper types so the
//! same data can be shown as a list, a creation notice or a change report.
//! Everything is markdown; the CLI renders it with termimad and the MCP
//! server returns it verbatim.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrapper Types   │    │   Formatted     │
//! │ (Project, Todo) │───▶│ & Result Types  │───▶│    Output       │
//! │                 │    │                 │    │  (Terminal/MCP) │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: [`ProjectList`], [`TodoList`], [`HistoryList`]
//! - [`results`]: [`CreateResult`], [`UpdateResult`], [`DeleteResult`],
//!   [`OperationStatus`]
//! - [`datetime`]: [`LocalDateTime`] and [`ShortLocalDateTime`]
//!
//! ```rust
//! use taskdeck_core::display::{OperationStatus, TodoList};
//! use taskdeck_core::models::Todo;
//!
//! let todo = Todo::new("Book venue");
//! let todos = vec![&todo];
//! let output = TodoList::with_title(&todos, "Ready").to_string();
//! assert!(output.contains("### Book venue (○ Open)"));
//!
//! let empty: Vec<&Todo> = Vec::new();
//! assert!(TodoList::new(&empty).to_string().contains("No todos found."));
//!
//! let failure = OperationStatus::failure("Nothing to toggle".to_string());
//! assert!(failure.to_string().starts_with('✗'));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{HistoryList, ProjectList, TodoList};
pub use datetime::{LocalDateTime, ShortLocalDateTime};
pub use results::{CreateResult, DeleteResult, Headline, OperationStatus, UpdateResult};
