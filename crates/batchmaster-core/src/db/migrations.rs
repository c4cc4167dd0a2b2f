//! Database schema initialization and migrations.

use std::time::Duration;

use crate::error::{Result, StorageResultExt};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS entries (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

impl super::Database {
    /// Initializes the database schema.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Concurrent processes wait for the writer instead of failing
        self.connection
            .busy_timeout(Duration::from_secs(5))
            .storage_context("Failed to set busy timeout")?;

        self.connection
            .execute_batch(SCHEMA_SQL)
            .storage_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Early builds stored entries without a timestamp column
        let has_updated_at: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('entries') WHERE name = 'updated_at'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_updated_at {
            self.connection
                .execute(
                    "ALTER TABLE entries ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
                    [],
                )
                .storage_context("Failed to add updated_at column to entries table")?;
        }

        Ok(())
    }
}
