//! Timer operations and expiry.
//!
//! Unknown timer ids are ignored by every operation; the boolean results
//! only report whether anything changed.

use jiff::Timestamp;
use log::{debug, info};

use super::{persist::Slice, CookingSession, SessionEvent};
use crate::models::{PhaseTask, Timer};

impl CookingSession {
    /// Starts a running countdown and returns its id. Several timers may run
    /// at once.
    pub async fn start_timer(
        &self,
        name: &str,
        duration_seconds: u64,
        recipe_id: Option<&str>,
    ) -> String {
        let now = self.now();
        let id = format!("timer_{}_{}", now.as_millisecond(), self.next_timer_seq());
        let timer = Timer::start(
            id.clone(),
            name.to_string(),
            duration_seconds,
            recipe_id.map(str::to_string),
            now,
        );

        info!("Starting timer {id} '{name}' for {duration_seconds}s");
        self.state().timers.push(timer);
        self.persist(&[Slice::Timers]).await;
        id
    }

    /// Starts a timer for a task, named after its instruction. Returns `None`
    /// when the task carries no usable duration.
    pub async fn start_task_timer(&self, task: &PhaseTask) -> Option<String> {
        let Some(seconds) = task.task.timer_seconds() else {
            debug!("Task {} has no timer duration", task.id);
            return None;
        };
        Some(self.start_timer(&task.task.instruction, seconds, None).await)
    }

    /// Running → Paused, freezing the remaining time.
    pub async fn pause_timer(&self, timer_id: &str) -> bool {
        self.update_timer(timer_id, Timer::pause).await
    }

    /// Paused → Running, continuing from the frozen remaining time.
    pub async fn resume_timer(&self, timer_id: &str) -> bool {
        self.update_timer(timer_id, Timer::resume).await
    }

    /// Extends a timer, paused or running.
    pub async fn add_time_to_timer(&self, timer_id: &str, extra_seconds: u64) -> bool {
        self.update_timer(timer_id, |timer, now| {
            timer.add_time(extra_seconds, now);
            true
        })
        .await
    }

    /// Removes a timer.
    pub async fn cancel_timer(&self, timer_id: &str) -> bool {
        let removed = {
            let mut state = self.state();
            let before = state.timers.len();
            state.timers.retain(|timer| timer.id != timer_id);
            state.timers.len() != before
        };

        if removed {
            info!("Cancelled timer {timer_id}");
            self.persist(&[Slice::Timers]).await;
        }
        removed
    }

    /// Remaining whole seconds, 0 for unknown timers.
    pub fn get_timer_remaining_seconds(&self, timer_id: &str) -> u64 {
        let now = self.now();
        self.state()
            .timers
            .iter()
            .find(|timer| timer.id == timer_id)
            .map_or(0, |timer| timer.remaining_seconds(now))
    }

    pub fn timer(&self, timer_id: &str) -> Option<Timer> {
        self.state()
            .timers
            .iter()
            .find(|timer| timer.id == timer_id)
            .cloned()
    }

    /// First timer named after the given task instruction.
    pub fn timer_for_task(&self, instruction: &str) -> Option<Timer> {
        self.state()
            .timers
            .iter()
            .find(|timer| timer.name == instruction)
            .cloned()
    }

    /// Re-evaluates running timers.
    ///
    /// A timer that reaches zero is flagged `expired` and announced with a
    /// single [`SessionEvent::TimerExpired`]. [`SessionEvent::Tick`] is sent
    /// while any timer is still counting down. Cheap when there are no
    /// timers.
    pub async fn tick(&self) {
        let now = self.now();
        let (expired, counting) = {
            let mut state = self.state();
            if state.timers.is_empty() {
                return;
            }

            let mut expired = Vec::new();
            for timer in &mut state.timers {
                if !timer.expired && timer.has_run_out(now) {
                    timer.expired = true;
                    expired.push((timer.id.clone(), timer.name.clone()));
                }
            }
            let counting = state
                .timers
                .iter()
                .any(|timer| !timer.is_paused && !timer.expired);
            (expired, counting)
        };

        if !expired.is_empty() {
            self.persist(&[Slice::Timers]).await;
            for (timer_id, name) in expired {
                info!("Timer {timer_id} '{name}' is done");
                self.emit(SessionEvent::TimerExpired { timer_id, name });
            }
        }
        if counting {
            self.emit(SessionEvent::Tick);
        }
    }

    async fn update_timer<F>(&self, timer_id: &str, update: F) -> bool
    where
        F: FnOnce(&mut Timer, Timestamp) -> bool + Send,
    {
        let now = self.now();
        let changed = {
            let mut state = self.state();
            match state.timers.iter_mut().find(|timer| timer.id == timer_id) {
                Some(timer) => update(timer, now),
                None => {
                    debug!("Ignoring unknown timer '{timer_id}'");
                    false
                }
            }
        };

        if changed {
            self.persist(&[Slice::Timers]).await;
        }
        changed
    }
}
