//! Builder for creating and hydrating CookingSession instances.

use std::{path::Path, sync::Arc};

use log::warn;

use super::CookingSession;
use crate::{
    clock::{Clock, SystemClock},
    config::Settings,
    error::Result,
    provider::PlanProvider,
    storage::{KeyValueStore, SqliteStore},
};

/// Builder for creating and configuring CookingSession instances.
#[derive(Clone, Default)]
pub struct SessionBuilder {
    settings: Settings,
    store: Option<Arc<dyn KeyValueStore>>,
    provider: Option<Arc<dyn PlanProvider>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/batchmaster/batchmaster.db` or
    /// `~/.local/share/batchmaster/batchmaster.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.settings.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an existing store instead of opening the SQLite database.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses the given plan source as is, bypassing the configured cache.
    pub fn with_provider(mut self, provider: Arc<dyn PlanProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the session and hydrates it from storage.
    ///
    /// Unreadable saved progress does not fail the build; the session starts
    /// empty and the problem is logged.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::FileSystem` if the database directory cannot
    /// be created, `SessionError::Storage` if database initialization fails
    /// and `SessionError::Fetch` if the HTTP client cannot be configured.
    pub async fn build(self) -> Result<CookingSession> {
        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(SqliteStore::open(self.settings.resolve_database_path()?).await?),
        };

        let provider = match self.provider {
            Some(provider) => provider,
            None => self.settings.plan_provider(Arc::clone(&store))?,
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let session = CookingSession::new(store, provider, clock);
        if let Err(e) = session.hydrate().await {
            warn!("{e}; starting with an empty session");
        }
        Ok(session)
    }
}
