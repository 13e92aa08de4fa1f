//! Builder for creating and configuring ProjectStore instances.

use std::path::{Path, PathBuf};

use super::ProjectStore;
use crate::{
    error::{Result, StoreError},
    slot::{MemorySlot, SlotStorage, SqliteSlot},
};

/// Slot name used when none is configured.
pub const DEFAULT_SLOT_NAME: &str = "project-storage";

enum Backend {
    Sqlite(Option<PathBuf>),
    Custom(Box<dyn SlotStorage>),
}

/// Builder for creating and configuring ProjectStore instances.
pub struct ProjectStoreBuilder {
    backend: Backend,
    slot_name: String,
}

impl ProjectStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            backend: Backend::Sqlite(None),
            slot_name: DEFAULT_SLOT_NAME.to_string(),
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/taskdeck/taskdeck.db` or
    /// `~/.local/share/taskdeck/taskdeck.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.backend = Backend::Sqlite(Some(path.as_ref().to_path_buf()));
        }
        self
    }

    pub fn with_slot_name(mut self, name: impl Into<String>) -> Self {
        self.slot_name = name.into();
        self
    }

    /// Uses a custom slot backend instead of SQLite.
    pub fn with_slot(mut self, slot: impl SlotStorage + 'static) -> Self {
        self.backend = Backend::Custom(Box::new(slot));
        self
    }

    /// Keeps state in a private in-memory slot.
    pub fn in_memory(self) -> Self {
        self.with_slot(MemorySlot::new())
    }

    /// Builds the store and rehydrates it from its slot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FileSystem` if the database directory cannot be created
    /// Returns `StoreError::Database` if database initialization fails
    pub fn build(self) -> Result<ProjectStore> {
        if self.slot_name.trim().is_empty() {
            return Err(StoreError::Configuration {
                message: "Slot name cannot be empty".to_string(),
            });
        }

        let slot: Box<dyn SlotStorage> = match self.backend {
            Backend::Custom(slot) => slot,
            Backend::Sqlite(path) => {
                let db_path = match path {
                    Some(path) => path,
                    None => default_database_path()?,
                };
                Box::new(SqliteSlot::open(prepare_database_path(db_path)?)?)
            }
        };

        Ok(ProjectStore::new(slot, self.slot_name))
    }
}

impl Default for ProjectStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the parent directory of `db_path` if needed.
pub fn prepare_database_path(db_path: PathBuf) -> Result<PathBuf> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::FileSystem {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(db_path)
}

/// Returns the default database path following XDG Base Directory
/// specification.
pub fn default_database_path() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("taskdeck")
        .place_data_file("taskdeck.db")
        .map_err(|e| StoreError::XdgDirectory(e.to_string()))
}
