//! Persistent key-value storage.
//!
//! Both state owners (the cooking session and the selection store) and the
//! plan cache persist opaque string snapshots through [`KeyValueStore`].
//! Each owner writes only under its own keys, listed in [`keys`], so no
//! cross-owner locking is needed.

use async_trait::async_trait;

use crate::error::Result;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Device-local durable storage of string values keyed by string.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads `key`; `Ok(None)` when nothing was stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing what was there.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a key that was never written succeeds.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Storage key namespace. The groups are disjoint per owner.
pub mod keys {
    /// Cooking session: active plan id.
    pub const ACTIVE_PLAN: &str = "active_plan";
    /// Cooking session: completed task ids.
    pub const COMPLETED_TASKS: &str = "completed_tasks";
    /// Cooking session: current phase num.
    pub const CURRENT_PHASE: &str = "current_phase";
    /// Cooking session: timers.
    pub const ACTIVE_TIMERS: &str = "active_timers";

    /// Every key owned by the cooking session.
    pub const SESSION_KEYS: [&str; 4] =
        [ACTIVE_PLAN, COMPLETED_TASKS, CURRENT_PHASE, ACTIVE_TIMERS];

    /// Selection store snapshot.
    pub const PLAN_STORAGE: &str = "plan_storage";

    /// Provider cache: plan catalogue.
    pub const CACHE_PLANS: &str = "cache_plans";

    /// Provider cache: one plan document by id.
    pub fn cache_plan(id: &str) -> String {
        format!("cache_plan_{id}")
    }

    /// Provider cache: one plan document by week number.
    pub fn cache_week(week: u32) -> String {
        format!("cache_week_{week}")
    }
}
