//! Generation history rows.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{HistoryEntry, Todo},
};

const INSERT_HISTORY_SQL: &str = "INSERT INTO history (prompt, name, description, todos, tags, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const HISTORY_COLUMNS: &str = "id, prompt, name, description, todos, tags, created_at";
const DELETE_HISTORY_SQL: &str = "DELETE FROM history WHERE id = ?1";

/// Column values for a history row that has not been inserted yet.
pub struct NewHistoryEntry<'a> {
    pub prompt: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub todos: &'a [Todo],
    pub tags: &'a [String],
    pub created_at: Timestamp,
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get::<_, i64>(0)? as u64,
        prompt: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        todos: json_column(row, 4)?,
        tags: json_column(row, 5)?,
        created_at: row.get::<_, String>(6)?.parse::<Timestamp>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
        })?,
    })
}

impl super::Database {
    /// Inserts a history row and returns it with its assigned ID.
    pub fn insert_history(&mut self, entry: &NewHistoryEntry<'_>) -> Result<HistoryEntry> {
        let todos_json = serde_json::to_string(entry.todos)?;
        let tags_json = serde_json::to_string(entry.tags)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_HISTORY_SQL,
            params![
                entry.prompt,
                entry.name,
                entry.description,
                todos_json,
                tags_json,
                entry.created_at.to_string()
            ],
        )
        .db_context("Failed to insert history entry")?;

        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(HistoryEntry {
            id,
            prompt: entry.prompt.to_string(),
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            todos: entry.todos.to_vec(),
            tags: entry.tags.to_vec(),
            created_at: entry.created_at,
        })
    }

    /// All history entries, newest first.
    pub fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let sql = format!("SELECT {HISTORY_COLUMNS} FROM history ORDER BY id DESC");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare query")?;

        let entries = stmt
            .query_map([], history_from_row)
            .db_context("Failed to query history")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read history row")?;

        Ok(entries)
    }

    pub fn get_history(&self, id: u64) -> Result<Option<HistoryEntry>> {
        let sql = format!("SELECT {HISTORY_COLUMNS} FROM history WHERE id = ?1");
        self.connection
            .query_row(&sql, params![id as i64], history_from_row)
            .optional()
            .db_context("Failed to query history entry")
    }

    /// Deletes a history row, returning whether it existed.
    pub fn delete_history(&self, id: u64) -> Result<bool> {
        let affected = self
            .connection
            .execute(DELETE_HISTORY_SQL, params![id as i64])
            .db_context("Failed to delete history entry")?;
        Ok(affected > 0)
    }
}
