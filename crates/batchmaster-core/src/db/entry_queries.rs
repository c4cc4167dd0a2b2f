//! Key-value entry queries.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::error::{Result, StorageResultExt};

const SELECT_ENTRY_SQL: &str = "SELECT value FROM entries WHERE key = ?1";
const UPSERT_ENTRY_SQL: &str = "INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";
const DELETE_ENTRY_SQL: &str = "DELETE FROM entries WHERE key = ?1";

impl super::Database {
    /// Reads the value stored under `key`.
    pub fn get_entry(&self, key: &str) -> Result<Option<String>> {
        self.connection
            .query_row(SELECT_ENTRY_SQL, params![key], |row| row.get(0))
            .optional()
            .storage_context("Failed to read entry")
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set_entry(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(UPSERT_ENTRY_SQL, params![key, value, now])
            .storage_context("Failed to write entry")?;
        Ok(())
    }

    /// Deletes `key`. Deleting a missing key is not an error.
    pub fn remove_entry(&mut self, key: &str) -> Result<()> {
        self.connection
            .execute(DELETE_ENTRY_SQL, params![key])
            .storage_context("Failed to delete entry")?;
        Ok(())
    }
}
