//! Runtime settings: where state lives and where plans come from.

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use crate::{
    error::{Result, SessionError},
    provider::{
        cache::DEFAULT_CACHE_TTL, CacheOptions, CachedPlanProvider, DirectoryPlanProvider,
        HttpPlanProvider, PlanProvider,
    },
    storage::KeyValueStore,
};

pub const DEFAULT_API_URL: &str = "https://api.example.com";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_URL: &str = "BATCHMASTER_API_URL";
pub const ENV_PLANS_DIR: &str = "BATCHMASTER_PLANS_DIR";
pub const ENV_CACHE_TTL_SECS: &str = "BATCHMASTER_CACHE_TTL_SECS";

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// SQLite file backing the key-value store; `None` selects the XDG
    /// default
    pub database_path: Option<PathBuf>,
    pub api_url: String,
    /// Local plan directory; takes precedence over the API when set
    pub plans_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            api_url: DEFAULT_API_URL.to_string(),
            plans_dir: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl Settings {
    /// Defaults overridden by `BATCHMASTER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            settings.api_url = url;
        }
        if let Some(dir) = lookup(ENV_PLANS_DIR).filter(|v| !v.trim().is_empty()) {
            settings.plans_dir = Some(PathBuf::from(dir));
        }
        if let Some(ttl) = lookup(ENV_CACHE_TTL_SECS) {
            let seconds = ttl.trim().parse::<u64>().map_err(|_| {
                SessionError::invalid_input(ENV_CACHE_TTL_SECS)
                    .with_reason(format!("'{ttl}' is not a number of seconds"))
            })?;
            settings.cache_ttl = Duration::from_secs(seconds);
        }

        Ok(settings)
    }

    /// Database path, falling back to `$XDG_DATA_HOME/batchmaster/batchmaster.db`.
    pub fn resolve_database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => default_database_path(),
        }
    }

    /// Builds the configured plan source wrapped in the store-backed cache.
    pub fn plan_provider(&self, store: Arc<dyn KeyValueStore>) -> Result<Arc<dyn PlanProvider>> {
        let options = CacheOptions {
            ttl: self.cache_ttl,
            ..CacheOptions::default()
        };

        let provider: Arc<dyn PlanProvider> = match &self.plans_dir {
            Some(dir) => Arc::new(
                CachedPlanProvider::new(DirectoryPlanProvider::new(dir), store)
                    .with_options(options),
            ),
            None => Arc::new(
                CachedPlanProvider::new(
                    HttpPlanProvider::new(&self.api_url, self.request_timeout)?,
                    store,
                )
                .with_options(options),
            ),
        };
        Ok(provider)
    }
}

/// Returns the default database path following the XDG Base Directory
/// specification.
pub fn default_database_path() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("batchmaster")
        .place_data_file("batchmaster.db")
        .map_err(|e| SessionError::XdgDirectory(e.to_string()))
}
