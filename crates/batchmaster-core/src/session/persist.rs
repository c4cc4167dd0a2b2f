//! Per-slice persistence of session state.
//!
//! Each slice is a plain value stored under its own key. Writes take the
//! write gate and read the in-memory state only once they hold it, so the
//! last write always carries the freshest snapshot.

use std::collections::BTreeSet;

use log::{debug, warn};

use super::{CookingSession, SessionState};
use crate::{
    error::{Result, SessionError},
    models::Timer,
    storage::keys,
};

/// One independently persisted part of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slice {
    ActivePlan,
    CompletedTasks,
    CurrentPhase,
    Timers,
}

impl Slice {
    pub(crate) const ALL: [Slice; 4] = [
        Slice::ActivePlan,
        Slice::CompletedTasks,
        Slice::CurrentPhase,
        Slice::Timers,
    ];

    fn key(self) -> &'static str {
        match self {
            Slice::ActivePlan => keys::ACTIVE_PLAN,
            Slice::CompletedTasks => keys::COMPLETED_TASKS,
            Slice::CurrentPhase => keys::CURRENT_PHASE,
            Slice::Timers => keys::ACTIVE_TIMERS,
        }
    }

    /// Serialized value of this slice, `None` meaning "remove the key".
    fn encode(self, state: &SessionState) -> Option<String> {
        match self {
            Slice::ActivePlan => state.active_plan_id.clone(),
            Slice::CurrentPhase => state.current_phase_id.clone(),
            Slice::CompletedTasks => Some(
                serde_json::to_string(&state.completed_task_ids)
                    .unwrap_or_else(|e| empty_list_fallback(self, &e)),
            ),
            Slice::Timers => Some(
                serde_json::to_string(&state.timers)
                    .unwrap_or_else(|e| empty_list_fallback(self, &e)),
            ),
        }
    }
}

fn empty_list_fallback(slice: Slice, err: &serde_json::Error) -> String {
    warn!("Could not serialize {}, storing empty default: {err}", slice.key());
    "[]".to_string()
}

/// Slices read back from storage.
#[derive(Debug, Default)]
pub(crate) struct StoredSession {
    pub active_plan_id: Option<String>,
    pub completed_task_ids: BTreeSet<String>,
    pub current_phase_id: Option<String>,
    pub timers: Vec<Timer>,
}

impl CookingSession {
    /// Writes the given slices from current in-memory state. A no-op before
    /// hydration. Write failures are logged and otherwise ignored.
    pub(crate) async fn persist(&self, slices: &[Slice]) {
        let _gate = self.inner.write_gate.lock().await;

        for &slice in slices {
            let value = {
                let state = self.state();
                if !state.is_initialized {
                    debug!("Skipping write of {} before hydration", slice.key());
                    return;
                }
                slice.encode(&state)
            };

            let result = match value {
                Some(value) => self.inner.store.set(slice.key(), &value).await,
                None => self.inner.store.remove(slice.key()).await,
            };
            if let Err(e) = result {
                warn!("Failed to persist {}: {e}", slice.key());
            }
        }
    }

    /// Removes every session key. Missing keys are not an error.
    pub(crate) async fn remove_persisted(&self) {
        let _gate = self.inner.write_gate.lock().await;
        for key in keys::SESSION_KEYS {
            if let Err(e) = self.inner.store.remove(key).await {
                warn!("Failed to remove {key}: {e}");
            }
        }
    }

    /// Reads all four slices. Each may be missing; any read or decode
    /// failure fails the whole load.
    pub(crate) async fn load_persisted(&self) -> Result<StoredSession> {
        let store = &self.inner.store;

        let active_plan_id = store
            .get(keys::ACTIVE_PLAN)
            .await?
            .filter(|id| !id.is_empty());
        let current_phase_id = store
            .get(keys::CURRENT_PHASE)
            .await?
            .filter(|id| !id.is_empty());

        let completed_task_ids = match store.get(keys::COMPLETED_TASKS).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| progress_error(keys::COMPLETED_TASKS, &e))?,
            None => BTreeSet::new(),
        };
        let timers = match store.get(keys::ACTIVE_TIMERS).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| progress_error(keys::ACTIVE_TIMERS, &e))?,
            None => Vec::new(),
        };

        Ok(StoredSession {
            active_plan_id,
            completed_task_ids,
            current_phase_id,
            timers,
        })
    }
}

fn progress_error(key: &str, err: &serde_json::Error) -> SessionError {
    SessionError::ProgressLoad {
        reason: format!("{key}: {err}"),
    }
}
