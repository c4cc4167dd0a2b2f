//! Views over cooking session state.

use std::fmt;

use jiff::Timestamp;

use super::countdown::Countdown;
use crate::{models::Timer, session::SessionState};

const BAR_WIDTH: usize = 20;

/// Overall progress as a text bar, e.g. `[#####---------------] 25%`.
#[derive(Debug, Clone, Copy)]
pub struct ProgressBar {
    pub percent: u8,
    pub width: usize,
}

impl ProgressBar {
    pub fn new(percent: u8) -> Self {
        Self {
            percent: percent.min(100),
            width: BAR_WIDTH,
        }
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = self.percent.min(100);
        let filled = self.width * usize::from(percent) / 100;
        write!(
            f,
            "`[{}{}]` {percent}%",
            "#".repeat(filled),
            "-".repeat(self.width - filled)
        )
    }
}

/// Phase list with per-phase completion and the current phase marked.
pub struct PhaseOverview<'a>(pub &'a SessionState);

impl fmt::Display for PhaseOverview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let Some(doc) = state.plan_data.as_deref() else {
            return writeln!(f, "No active plan.");
        };
        if doc.phases().is_empty() {
            return writeln!(f, "This plan has no phases.");
        }

        writeln!(f, "## Phases")?;
        writeln!(f)?;
        for phase in doc.phases() {
            let done = phase
                .task_ids()
                .filter(|id| state.completed_task_ids.contains(id.as_str()))
                .count();
            let total = phase.task_count();
            let icon = if total > 0 && done == total { "✓" } else { "○" };
            let current = if state.current_phase_id.as_deref() == Some(phase.num.as_str()) {
                " ➤ *current*"
            } else {
                ""
            };

            write!(f, "- {icon} **{}. {}**", phase.num, phase.name)?;
            if !phase.start.is_empty() || !phase.end.is_empty() {
                write!(f, " ({} - {})", phase.start, phase.end)?;
            }
            writeln!(f, " {done}/{total}{current}")?;
        }
        Ok(())
    }
}

/// Tasks of the current phase grouped by section, with their ids.
pub struct TaskChecklist<'a>(pub &'a SessionState);

impl fmt::Display for TaskChecklist<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        let phase = state
            .current_phase_id
            .as_deref()
            .and_then(|num| state.plan_data.as_deref()?.phase(num));
        let Some(phase) = phase else {
            return writeln!(f, "No current phase.");
        };

        writeln!(f, "## Phase {}: {}", phase.num, phase.name)?;

        let mut section = None;
        for entry in phase.tasks() {
            if section.as_deref() != Some(entry.section.as_str()) {
                writeln!(f)?;
                if !entry.section.is_empty() {
                    writeln!(f, "### {}", entry.section)?;
                    writeln!(f)?;
                }
                section = Some(entry.section.clone());
            }

            let check = if state.completed_task_ids.contains(entry.id.as_str()) {
                "✓"
            } else {
                "○"
            };
            write!(f, "- {check} `{}`", entry.id)?;
            if !entry.task.time.is_empty() {
                write!(f, " *{}*", entry.task.time)?;
            }
            writeln!(f, " {}", entry.task.instruction)?;
        }

        if phase.task_count() == 0 {
            writeln!(f)?;
            writeln!(f, "No tasks in this phase.")?;
        }
        Ok(())
    }
}

/// Timers with their remaining time at a given instant.
pub struct TimerBoard<'a> {
    pub timers: &'a [Timer],
    pub now: Timestamp,
}

impl<'a> TimerBoard<'a> {
    pub fn new(timers: &'a [Timer], now: Timestamp) -> Self {
        Self { timers, now }
    }
}

impl fmt::Display for TimerBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timers.is_empty() {
            return writeln!(f, "No active timers.");
        }

        writeln!(f, "## Timers")?;
        writeln!(f)?;
        for timer in self.timers {
            let remaining = Countdown(timer.remaining_seconds(self.now));
            let state = if timer.expired {
                "✓ Done".to_string()
            } else {
                timer.state().to_string()
            };
            writeln!(
                f,
                "- **{remaining}** {} ({state}) `{}`",
                timer.name, timer.id
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Phase, PlanDocument, Section, Task};

    fn state() -> SessionState {
        let mut doc = PlanDocument::default();
        doc.plan.phases = vec![
            Phase {
                num: "1".to_string(),
                name: "Prep".to_string(),
                sections: vec![Section {
                    name: "Vegetables".to_string(),
                    tasks: vec![
                        Task {
                            time: "10min".to_string(),
                            instruction: "Dice onions".to_string(),
                            ..Default::default()
                        },
                        Task {
                            instruction: "Peel carrots".to_string(),
                            ..Default::default()
                        },
                    ],
                }],
                ..Default::default()
            },
            Phase {
                num: "2".to_string(),
                name: "Cook".to_string(),
                ..Default::default()
            },
        ];

        SessionState {
            active_plan_id: Some("P1".to_string()),
            plan_data: Some(Arc::new(doc)),
            current_phase_id: Some("1".to_string()),
            completed_task_ids: ["1/0/0".to_string()].into_iter().collect(),
            is_initialized: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(ProgressBar::new(0).to_string(), format!("`[{}]` 0%", "-".repeat(20)));
        assert_eq!(ProgressBar::new(100).to_string(), format!("`[{}]` 100%", "#".repeat(20)));
        assert!(ProgressBar::new(50).to_string().starts_with("`[##########-"));
    }

    #[test]
    fn test_phase_overview_marks_current() {
        let state = state();
        let output = PhaseOverview(&state).to_string();
        assert!(output.contains("- ○ **1. Prep** 1/2 ➤ *current*"));
        assert!(output.contains("- ○ **2. Cook** 0/0\n"));
    }

    #[test]
    fn test_task_checklist() {
        let state = state();
        let output = TaskChecklist(&state).to_string();
        assert!(output.contains("## Phase 1: Prep"));
        assert!(output.contains("### Vegetables"));
        assert!(output.contains("- ✓ `1/0/0` *10min* Dice onions"));
        assert!(output.contains("- ○ `1/0/1` Peel carrots"));
    }

    #[test]
    fn test_views_without_plan() {
        let state = SessionState::default();
        assert_eq!(PhaseOverview(&state).to_string(), "No active plan.\n");
        assert_eq!(TaskChecklist(&state).to_string(), "No current phase.\n");
    }

    #[test]
    fn test_timer_board() {
        let start = Timestamp::from_second(1_700_000_000).expect("timestamp");
        let later = Timestamp::from_second(1_700_000_060).expect("timestamp");
        let timers = vec![Timer::start(
            "timer_1".to_string(),
            "Boil water".to_string(),
            600,
            None,
            start,
        )];

        let output = TimerBoard::new(&timers, later).to_string();
        assert!(output.contains("**09:00** Boil water (➤ Running) `timer_1`"));
        assert_eq!(TimerBoard::new(&[], later).to_string(), "No active timers.\n");
    }
}
