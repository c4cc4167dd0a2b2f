//! Countdown timer model.
//!
//! A timer is either running (remaining time derived from `start_time`) or
//! paused (remaining time frozen in `paused_remaining_seconds`). All
//! arithmetic is done in milliseconds against an injected "now" so callers
//! control the clock.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Whether a timer is counting down or frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Paused,
}

/// A countdown timer attached to a cooking session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: String,
    /// Display label; the task instruction when started from a task
    pub name: String,
    pub duration_seconds: u64,
    pub start_time: Timestamp,
    pub is_paused: bool,
    /// Frozen remaining time, only set while paused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_remaining_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    /// Set once the expiry notification has been emitted
    #[serde(default)]
    pub expired: bool,
}

impl Timer {
    /// Creates a running timer started at `now`.
    pub fn start(
        id: String,
        name: String,
        duration_seconds: u64,
        recipe_id: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            duration_seconds,
            start_time: now,
            is_paused: false,
            paused_remaining_seconds: None,
            recipe_id,
            expired: false,
        }
    }

    pub fn state(&self) -> TimerState {
        if self.is_paused {
            TimerState::Paused
        } else {
            TimerState::Running
        }
    }

    /// Remaining whole seconds at `now`, floored at zero.
    pub fn remaining_seconds(&self, now: Timestamp) -> u64 {
        if self.is_paused {
            return self.paused_remaining_seconds.unwrap_or(0);
        }
        // i128 holds any u64 duration in milliseconds without wrapping
        let elapsed_ms =
            i128::from(now.as_millisecond()) - i128::from(self.start_time.as_millisecond());
        let remaining_ms = i128::from(self.duration_seconds) * 1000 - elapsed_ms;
        u64::try_from(remaining_ms.max(0) / 1000).unwrap_or(u64::MAX)
    }

    /// Running → Paused. Returns false when already paused.
    pub fn pause(&mut self, now: Timestamp) -> bool {
        if self.is_paused {
            return false;
        }
        self.paused_remaining_seconds = Some(self.remaining_seconds(now));
        self.is_paused = true;
        true
    }

    /// Paused → Running, back-dating `start_time` so elapsed-time arithmetic
    /// continues from the frozen remaining time. Returns false when not
    /// paused.
    pub fn resume(&mut self, now: Timestamp) -> bool {
        if !self.is_paused {
            return false;
        }
        let remaining = self.paused_remaining_seconds.unwrap_or(0);
        let consumed = self.duration_seconds.saturating_sub(remaining);
        self.start_time = now
            .checked_sub(SignedDuration::from_secs(
                i64::try_from(consumed).unwrap_or(i64::MAX),
            ))
            .unwrap_or(now);
        self.is_paused = false;
        self.paused_remaining_seconds = None;
        true
    }

    /// Extends the timer in place without touching `start_time`.
    pub fn add_time(&mut self, extra_seconds: u64, now: Timestamp) {
        self.duration_seconds = self.duration_seconds.saturating_add(extra_seconds);
        if let Some(remaining) = self.paused_remaining_seconds.as_mut() {
            *remaining = remaining.saturating_add(extra_seconds);
        }
        if self.remaining_seconds(now) > 0 {
            self.expired = false;
        }
    }

    /// True for a running timer that has reached zero.
    pub fn has_run_out(&self, now: Timestamp) -> bool {
        !self.is_paused && self.remaining_seconds(now) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + seconds).expect("valid timestamp")
    }

    #[test]
    fn test_running_countdown() {
        let timer = Timer::start("t".into(), "Boil water".into(), 600, None, at(0));
        assert_eq!(timer.remaining_seconds(at(0)), 600);
        assert_eq!(timer.remaining_seconds(at(60)), 540);
        assert_eq!(timer.remaining_seconds(at(900)), 0);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut timer = Timer::start("t".into(), "Rest dough".into(), 300, None, at(0));
        assert!(timer.pause(at(100)));
        assert!(!timer.pause(at(150)));
        assert_eq!(timer.remaining_seconds(at(250)), 200);

        assert!(timer.resume(at(250)));
        assert_eq!(timer.remaining_seconds(at(250)), 200);
        assert_eq!(timer.remaining_seconds(at(260)), 190);
        assert!(!timer.resume(at(260)));
    }

    #[test]
    fn test_add_time_to_paused_timer() {
        let mut timer = Timer::start("t".into(), "Simmer".into(), 60, None, at(0));
        timer.pause(at(30));
        timer.add_time(60, at(30));
        assert_eq!(timer.duration_seconds, 120);
        assert_eq!(timer.remaining_seconds(at(500)), 90);
        timer.resume(at(500));
        assert_eq!(timer.remaining_seconds(at(510)), 80);
    }

    #[test]
    fn test_add_time_clears_expired_flag() {
        let mut timer = Timer::start("t".into(), "Bake".into(), 10, None, at(0));
        assert!(timer.has_run_out(at(20)));
        timer.expired = true;
        timer.add_time(30, at(20));
        assert!(!timer.expired);
        assert_eq!(timer.remaining_seconds(at(20)), 20);
    }

    #[test]
    fn test_huge_durations_do_not_wrap() {
        let timer = Timer::start("t".into(), "Forever".into(), u64::MAX, None, at(0));
        assert_eq!(timer.remaining_seconds(at(0)), u64::MAX);
        assert_eq!(timer.remaining_seconds(at(60)), u64::MAX - 60);
        assert!(!timer.has_run_out(at(60)));

        let mut timer = Timer::start("t".into(), "Boil".into(), 600, None, at(0));
        timer.add_time(u64::MAX - 100, at(0));
        assert_eq!(timer.duration_seconds, u64::MAX);
        assert!(timer.remaining_seconds(at(10)) > 600);

        let mut paused = Timer::start("t".into(), "Rest".into(), u64::MAX, None, at(0));
        assert!(paused.pause(at(10)));
        assert!(paused.resume(at(20)));
        assert_eq!(paused.remaining_seconds(at(20)), u64::MAX - 10);
    }
}
