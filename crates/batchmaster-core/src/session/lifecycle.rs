//! Hydration, plan activation and deactivation.

use std::sync::Arc;

use log::{debug, error, info, warn};

use super::{persist::Slice, CookingSession, SessionEvent, SessionState};
use crate::{
    error::{Result, SessionError},
    provider::fetch_plan,
};

impl CookingSession {
    /// Restores saved progress from storage and marks the session
    /// initialized. Runs once; later calls are no-ops.
    ///
    /// When a plan was active, its document is fetched again without
    /// touching the restored progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProgressLoad` when saved progress could not be
    /// read. The session is still initialized, with empty defaults.
    pub async fn hydrate(&self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }

        let (stored, failure) = match self.load_persisted().await {
            Ok(stored) => (stored, None),
            Err(e) => {
                let failure = match e {
                    SessionError::ProgressLoad { .. } => e,
                    other => SessionError::ProgressLoad {
                        reason: other.to_string(),
                    },
                };
                warn!("{failure}");
                (Default::default(), Some(failure))
            }
        };

        let has_plan = {
            let mut state = self.state();
            state.active_plan_id = stored.active_plan_id;
            state.completed_task_ids = stored.completed_task_ids;
            state.current_phase_id = stored.current_phase_id;
            state.timers = stored.timers;
            state.error = failure.as_ref().map(SessionError::user_message);
            state.is_initialized = true;

            info!(
                "Session hydrated: plan={:?} phase={:?} completed={} timers={}",
                state.active_plan_id,
                state.current_phase_id,
                state.completed_task_ids.len(),
                state.timers.len()
            );
            state.active_plan_id.is_some()
        };

        if has_plan {
            if let Err(e) = self.reload_plan().await {
                warn!("Could not restore plan data: {e}");
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Fetches the document of the active plan again, keeping progress.
    /// Picks the first phase when no phase is recorded yet.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PlanLoad` if the fetch fails.
    pub async fn reload_plan(&self) -> Result<()> {
        let Some(plan_id) = self.active_plan_id() else {
            return Ok(());
        };

        let generation = self.begin_loading();
        let document = match fetch_plan(self.inner.provider.as_ref(), &plan_id).await {
            Ok(document) => document,
            Err(e) => return Err(self.fail_loading(generation, &plan_id, &e)),
        };

        let picked_phase = {
            let mut state = self.state();
            if !self.is_latest_generation(generation)
                || state.active_plan_id.as_deref() != Some(plan_id.as_str())
            {
                debug!("Discarding superseded reload of {plan_id}");
                return Ok(());
            }

            let picked_phase = state.current_phase_id.is_none();
            if picked_phase {
                state.current_phase_id = document.first_phase_num().map(str::to_string);
            }
            state.plan_data = Some(Arc::new(document));
            state.is_loading = false;
            state.error = None;
            picked_phase
        };

        if picked_phase {
            self.persist(&[Slice::CurrentPhase]).await;
        }
        Ok(())
    }

    /// Starts a new cooking session for `plan_id`.
    ///
    /// Fetches the plan first. On success the previous progress is discarded:
    /// completed tasks and timers are cleared and the first phase becomes
    /// current. On failure existing state is left untouched. An empty id is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInitialized` before hydration and
    /// `SessionError::PlanLoad` if the plan cannot be fetched.
    pub async fn activate_plan(&self, plan_id: &str) -> Result<()> {
        if plan_id.is_empty() {
            debug!("Ignoring activation of an empty plan id");
            return Ok(());
        }
        if !self.is_initialized() {
            return Err(SessionError::NotInitialized);
        }

        info!("Activating plan {plan_id}");
        let generation = self.begin_loading();
        let document = match fetch_plan(self.inner.provider.as_ref(), plan_id).await {
            Ok(document) => document,
            Err(e) => return Err(self.fail_loading(generation, plan_id, &e)),
        };

        {
            let mut state = self.state();
            if !self.is_latest_generation(generation) {
                debug!("Discarding superseded fetch of {plan_id}");
                return Ok(());
            }

            state.active_plan_id = Some(plan_id.to_string());
            state.current_phase_id = document.first_phase_num().map(str::to_string);
            state.completed_task_ids.clear();
            state.timers.clear();
            state.plan_data = Some(Arc::new(document));
            state.is_loading = false;
            state.error = None;
        }

        self.persist(&Slice::ALL).await;
        self.emit(SessionEvent::PlanActivated {
            plan_id: plan_id.to_string(),
        });
        Ok(())
    }

    /// Ends the current session: resets all fields and removes every
    /// persisted key. Any in-flight plan fetch is discarded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInitialized` before hydration.
    pub async fn clear_active_plan(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(SessionError::NotInitialized);
        }

        info!("Clearing active plan");
        self.next_generation();
        *self.state() = SessionState {
            is_initialized: true,
            ..SessionState::default()
        };

        self.remove_persisted().await;
        self.emit(SessionEvent::PlanCleared);
        Ok(())
    }

    fn begin_loading(&self) -> u64 {
        let generation = self.next_generation();
        let mut state = self.state();
        state.is_loading = true;
        state.error = None;
        generation
    }

    fn fail_loading(&self, generation: u64, plan_id: &str, cause: &SessionError) -> SessionError {
        let err = SessionError::plan_load(plan_id, cause);
        error!("{err}");

        if self.is_latest_generation(generation) {
            let mut state = self.state();
            state.is_loading = false;
            state.error = Some(err.user_message());
        }
        err
    }
}
