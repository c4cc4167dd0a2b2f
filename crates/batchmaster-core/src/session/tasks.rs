//! Task completion, phases and progress.

use log::debug;

use super::{persist::Slice, CookingSession};
use crate::models::{Phase, PhaseTask, PlanDocument};

impl CookingSession {
    /// Marks a task done. Returns true when the set changed.
    ///
    /// Ids that do not belong to the loaded plan are ignored.
    pub async fn complete_task(&self, task_id: &str) -> bool {
        let changed = {
            let mut state = self.state();
            let known = state
                .plan_data
                .as_deref()
                .is_some_and(|doc| doc.all_task_ids().any(|id| id.as_str() == task_id));
            if !known {
                debug!("Ignoring completion of unknown task '{task_id}'");
                return false;
            }
            state.completed_task_ids.insert(task_id.to_string())
        };

        if changed {
            self.persist(&[Slice::CompletedTasks]).await;
        }
        changed
    }

    /// Marks a task not done. Returns true when the set changed.
    pub async fn uncomplete_task(&self, task_id: &str) -> bool {
        let changed = self.state().completed_task_ids.remove(task_id);
        if changed {
            self.persist(&[Slice::CompletedTasks]).await;
        }
        changed
    }

    pub fn is_task_completed(&self, task_id: &str) -> bool {
        self.state().completed_task_ids.contains(task_id)
    }

    /// Makes `phase_id` the current phase. Empty ids are ignored.
    pub async fn set_phase(&self, phase_id: &str) {
        if phase_id.is_empty() {
            debug!("Ignoring empty phase id");
            return;
        }

        self.state().current_phase_id = Some(phase_id.to_string());
        self.persist(&[Slice::CurrentPhase]).await;
    }

    /// Phases of the loaded plan, empty without one.
    pub fn get_all_phases(&self) -> Vec<Phase> {
        self.with_plan(|doc| doc.phases().to_vec())
            .unwrap_or_default()
    }

    pub fn current_phase(&self) -> Option<Phase> {
        let state = self.state();
        let phase_id = state.current_phase_id.as_deref()?;
        state.plan_data.as_deref()?.phase(phase_id).cloned()
    }

    /// Tasks of the current phase in section order, with derived ids.
    pub fn get_current_phase_tasks(&self) -> Vec<PhaseTask> {
        self.current_phase()
            .map(|phase| phase.tasks())
            .unwrap_or_default()
    }

    /// Overall progress as a whole percentage of all tasks across all
    /// phases. Rounds down, so 100 means every task is done. Zero without
    /// a plan or when the plan has no tasks.
    pub fn calculate_progress(&self) -> u8 {
        let state = self.state();
        let Some(doc) = state.plan_data.as_deref() else {
            return 0;
        };
        let done = doc
            .all_task_ids()
            .filter(|id| state.completed_task_ids.contains(id.as_str()))
            .count();
        percentage(done, doc.total_task_count())
    }

    /// Progress within one phase, same rounding as
    /// [`CookingSession::calculate_progress`].
    pub fn phase_progress(&self, phase_num: &str) -> u8 {
        let state = self.state();
        let Some(phase) = state
            .plan_data
            .as_deref()
            .and_then(|doc| doc.phase(phase_num))
        else {
            return 0;
        };
        let done = phase
            .task_ids()
            .filter(|id| state.completed_task_ids.contains(id.as_str()))
            .count();
        percentage(done, phase.task_count())
    }

    fn with_plan<T>(&self, f: impl FnOnce(&PlanDocument) -> T) -> Option<T> {
        self.state().plan_data.as_deref().map(f)
    }
}

fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (done.min(total) * 100) / total;
    u8::try_from(percent).unwrap_or(100)
}
