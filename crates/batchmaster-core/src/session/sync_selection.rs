//! Following the selection store.
//!
//! The session observes the selected plan id and converges on it. Nothing
//! flows back: the selection store never reads session state.

use std::sync::Arc;

use log::{debug, warn};
use tokio::{sync::watch, task::JoinHandle};

use super::CookingSession;
use crate::{error::Result, selection::SelectedPlan};

impl CookingSession {
    /// One comparison step between the selected id and the active plan.
    ///
    /// A different non-empty selection is activated; an empty selection
    /// clears the active plan; matching ids do nothing. Skipped before
    /// hydration.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError::PlanLoad` from activation.
    pub async fn reconcile(&self, selected: Option<&str>) -> Result<()> {
        let (initialized, active) = {
            let state = self.state();
            (state.is_initialized, state.active_plan_id.clone())
        };
        if !initialized {
            debug!("Skipping selection sync before hydration");
            return Ok(());
        }

        match (selected.filter(|id| !id.is_empty()), active.as_deref()) {
            (Some(selected), active) if active != Some(selected) => {
                self.activate_plan(selected).await
            }
            (None, Some(_)) => self.clear_active_plan().await,
            _ => Ok(()),
        }
    }

    /// Keeps reconciling with every value published on `selection` until
    /// the sender or this session goes away. The current value is applied
    /// right away. A store that has not been hydrated yet is waited out.
    pub fn spawn_selection_sync(
        &self,
        mut selection: watch::Receiver<SelectedPlan>,
    ) -> JoinHandle<()> {
        let session = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            loop {
                let selected = selection.borrow_and_update().clone();
                match selected {
                    SelectedPlan::Pending => debug!("Selection not hydrated yet, waiting"),
                    SelectedPlan::Ready(selected) => {
                        let Some(inner) = session.upgrade() else {
                            break;
                        };
                        let engine = CookingSession { inner };
                        if let Err(e) = engine.reconcile(selected.as_deref()).await {
                            warn!("Selection sync failed: {e}");
                        }
                    }
                }

                if selection.changed().await.is_err() {
                    debug!("Selection store closed, stopping sync");
                    break;
                }
            }
        })
    }
}
