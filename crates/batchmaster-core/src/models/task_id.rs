//! Derived task identity.
//!
//! Tasks in a plan document have no primary key. Every place that records
//! completion or relates a timer to a task goes through [`TaskId::derive`],
//! which builds `"<phase num>/<section index>/<task index>"`. Positional ids
//! stay distinct even when two tasks share the same instruction text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Task;

/// Identifier of a task within a plan document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Derives the canonical id of the task at `task_index` inside section
    /// `section_index` of phase `phase_num`.
    pub fn derive(phase_num: &str, section_index: usize, task_index: usize) -> Self {
        Self(format!("{phase_num}/{section_index}/{task_index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A task flattened out of its phase, annotated with its derived id and the
/// name of the section it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTask {
    pub id: TaskId,
    pub section: String,
    pub task: Task,
}
