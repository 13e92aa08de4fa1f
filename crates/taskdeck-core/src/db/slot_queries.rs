//! Named slot reads and writes.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::error::{DatabaseResultExt, Result};

const SELECT_SLOT_SQL: &str = "SELECT payload FROM slots WHERE name = ?1";
const UPSERT_SLOT_SQL: &str = "INSERT INTO slots (name, payload, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(name) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at";
const DELETE_SLOT_SQL: &str = "DELETE FROM slots WHERE name = ?1";

impl super::Database {
    /// Returns the payload stored under `name`, if any.
    pub fn read_slot(&self, name: &str) -> Result<Option<String>> {
        self.connection
            .query_row(SELECT_SLOT_SQL, params![name], |row| row.get(0))
            .optional()
            .db_context("Failed to read slot")
    }

    /// Replaces the payload stored under `name`.
    pub fn write_slot(&self, name: &str, payload: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(UPSERT_SLOT_SQL, params![name, payload, now])
            .db_context("Failed to write slot")?;
        Ok(())
    }

    /// Removes the slot. Clearing a missing slot is not an error.
    pub fn clear_slot(&self, name: &str) -> Result<()> {
        self.connection
            .execute(DELETE_SLOT_SQL, params![name])
            .db_context("Failed to clear slot")?;
        Ok(())
    }
}
