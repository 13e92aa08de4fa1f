//! Durable key-value slots holding the serialized store state.
//!
//! A slot is a named string value that is read once at startup and
//! overwritten wholesale after every mutation. [`SqliteSlot`] keeps slots in
//! the application database; [`MemorySlot`] keeps them in a shared map for
//! tests and throwaway stores.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    db::Database,
    error::{Result, StoreError},
};

/// Backend for a named durable slot.
pub trait SlotStorage: Send {
    /// Reads the blob stored under `name`; `None` when the slot was never written.
    fn load(&self, name: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `name`.
    fn save(&self, name: &str, blob: &str) -> Result<()>;

    fn clear(&self, name: &str) -> Result<()>;
}

/// Slot backed by the `slots` table of a SQLite database.
///
/// The database is opened for each call so several processes (the CLI and a
/// running MCP server) can share one file.
#[derive(Debug, Clone)]
pub struct SqliteSlot {
    db_path: PathBuf,
}

impl SqliteSlot {
    /// Opens the database once to create the schema, then keeps only the path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        Database::new(&db_path)?;
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

impl SlotStorage for SqliteSlot {
    fn load(&self, name: &str) -> Result<Option<String>> {
        Database::new(&self.db_path)?.read_slot(name)
    }

    fn save(&self, name: &str, blob: &str) -> Result<()> {
        Database::new(&self.db_path)?.write_slot(name, blob)
    }

    fn clear(&self, name: &str) -> Result<()> {
        Database::new(&self.db_path)?.clear_slot(name)
    }
}

/// In-process slot map. Clones share the same map, so a second store built
/// from a clone sees what the first one persisted.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots.lock().map_err(|_| StoreError::Configuration {
            message: "Memory slot lock poisoned".to_string(),
        })
    }
}

impl SlotStorage for MemorySlot {
    fn load(&self, name: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn save(&self, name: &str, blob: &str) -> Result<()> {
        self.lock()?.insert(name.to_string(), blob.to_string());
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<()> {
        self.lock()?.remove(name);
        Ok(())
    }
}
