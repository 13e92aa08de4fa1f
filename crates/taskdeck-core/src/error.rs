//! The error type shared by the store, the slot backends, and the history log.
//!
//! Lookups that miss are reported as values (`ProjectNotFound`, ...) so
//! callers can tell them apart from storage failures with
//! [`StoreError::is_not_found`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Project with ID '{id}' not found")]
    ProjectNotFound { id: String },

    /// No todo in any project carries the ID
    #[error("Todo with ID '{id}' not found")]
    TodoNotFound { id: String },

    #[error("History entry with ID {id} not found")]
    HistoryNotFound { id: u64 },

    /// A parameter failed validation; nothing was changed
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// SQLite failed while reading or writing a slot or history row
    #[error("Storage failure: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Cannot prepare '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No data directory could be resolved for the default database
    #[error("Cannot locate data directory: {0}")]
    XdgDirectory(String),

    /// State or history JSON could not be encoded or decoded
    #[error("Malformed JSON: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

/// Half-built [`StoreError::Database`]; finish it with the rusqlite error.
pub struct DatabaseFailure(String);

impl DatabaseFailure {
    pub fn with_source(self, source: rusqlite::Error) -> StoreError {
        StoreError::Database {
            message: self.0,
            source,
        }
    }
}

/// Half-built [`StoreError::InvalidInput`] naming the offending field.
pub struct FieldFailure(String);

impl FieldFailure {
    pub fn with_reason(self, reason: impl Into<String>) -> StoreError {
        StoreError::InvalidInput {
            field: self.0,
            reason: reason.into(),
        }
    }
}

impl StoreError {
    /// `StoreError::database("Failed to read slot").with_source(e)`
    pub fn database(message: impl Into<String>) -> DatabaseFailure {
        DatabaseFailure(message.into())
    }

    /// `StoreError::invalid_input("name").with_reason("cannot be empty")`
    pub fn invalid_input(field: impl Into<String>) -> FieldFailure {
        FieldFailure(field.into())
    }

    pub fn project_not_found(id: impl Into<String>) -> Self {
        Self::ProjectNotFound { id: id.into() }
    }

    pub fn todo_not_found(id: impl Into<String>) -> Self {
        Self::TodoNotFound { id: id.into() }
    }

    /// True when the error only reports a missing project, todo, or history
    /// entry.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. } | Self::TodoNotFound { .. } | Self::HistoryNotFound { .. }
        )
    }
}

/// Attaches a message to rusqlite failures.
pub trait DatabaseResultExt<T> {
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| StoreError::database(message).with_source(e))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
