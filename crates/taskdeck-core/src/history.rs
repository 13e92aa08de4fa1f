//! Generation history.
//!
//! Each generated batch is copied into the `history` table together with its
//! prompt. Entries are never linked back to the store: toggling or editing a
//! todo later does not change its history copy.

use std::path::Path;

use jiff::Timestamp;
use log::debug;

use crate::{
    db::{Database, NewHistoryEntry},
    display::ShortLocalDateTime,
    error::{Result, StoreError},
    models::{history::derive_tags, HistoryEntry, Todo},
};

/// Number of leading prompt words used in an entry name.
const NAME_WORDS: usize = 5;

/// Append-mostly log of generation batches.
pub struct HistoryLog {
    db: Database,
}

impl HistoryLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            db: Database::new(path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            db: Database::in_memory()?,
        })
    }

    /// Records a batch, deriving its name, description, and tags.
    pub fn record(&mut self, prompt: &str, todos: &[Todo]) -> Result<HistoryEntry> {
        let created_at = Timestamp::now();
        let name = entry_name(prompt, &created_at);
        let description = format!("Generated {} todos for: {prompt}", todos.len());
        let tags = derive_tags(todos);

        let entry = self.db.insert_history(&NewHistoryEntry {
            prompt,
            name: &name,
            description: &description,
            todos,
            tags: &tags,
            created_at,
        })?;
        debug!("Recorded history entry {} ({} todos)", entry.id, todos.len());
        Ok(entry)
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        self.db.list_history()
    }

    pub fn get(&self, id: u64) -> Result<Option<HistoryEntry>> {
        self.db.get_history(id)
    }

    /// Deletes an entry and returns it.
    ///
    /// # Errors
    ///
    /// * `StoreError::HistoryNotFound` - When no entry has the given id
    pub fn remove(&mut self, id: u64) -> Result<HistoryEntry> {
        let entry = self
            .db
            .get_history(id)?
            .ok_or(StoreError::HistoryNotFound { id })?;
        self.db.delete_history(id)?;
        Ok(entry)
    }

    /// Entries whose prompt, todo tasks, or categories contain `query`,
    /// ignoring case. Newest first.
    pub fn search(&self, query: &str) -> Result<Vec<HistoryEntry>> {
        let query = query.trim();
        let entries = self.list()?;
        if query.is_empty() {
            return Ok(entries);
        }
        Ok(entries.into_iter().filter(|e| e.matches(query)).collect())
    }
}

/// `"<first five prompt words>... (<Mon d, HH:MM>)"`
fn entry_name(prompt: &str, created_at: &Timestamp) -> String {
    let words = prompt
        .split_whitespace()
        .take(NAME_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{words}... ({})", ShortLocalDateTime(created_at))
}
