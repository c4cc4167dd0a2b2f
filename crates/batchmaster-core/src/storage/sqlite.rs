//! SQLite-backed key-value store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task;

use super::KeyValueStore;
use crate::{
    db::Database,
    error::{Result, ResultExt, SessionError},
};

/// Durable store on a SQLite file. Every call runs on the blocking pool with
/// its own connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (and if needed creates) the database at `path`.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), SessionError>(())
        })
        .await
        .with_context(JOIN_CONTEXT)??;

        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

const JOIN_CONTEXT: &str = "Task join error";

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_entry(&key)
        })
        .await
        .with_context(JOIN_CONTEXT)?
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let db_path = self.db_path.clone();
        let key = key.to_string();
        let value = value.to_string();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_entry(&key, &value)
        })
        .await
        .with_context(JOIN_CONTEXT)?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let db_path = self.db_path.clone();
        let key = key.to_string();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.remove_entry(&key)
        })
        .await
        .with_context(JOIN_CONTEXT)?
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("store.db");

        let store = SqliteStore::open(&path).await.expect("open store");
        store.set("current_phase", "2").await.expect("write");
        drop(store);

        let reopened = SqliteStore::open(&path).await.expect("reopen store");
        assert_eq!(
            reopened.get("current_phase").await.expect("read").as_deref(),
            Some("2")
        );
        reopened.remove("never_written").await.expect("remove missing key");
    }
}
