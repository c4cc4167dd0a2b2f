//! Plan document model: the immutable description of one week of batch
//! cooking, as delivered by a plan source.
//!
//! The wire format uses the compact field names of the upstream data
//! source; every struct maps them onto descriptive names with serde renames.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::task_id::{PhaseTask, TaskId};

/// A numeric or free-text quantity, as found in ingredient lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Quantity::Number(n) => write!(f, "{n}"),
            Quantity::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Text(String::new())
    }
}

/// One line of the plan's shopping list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Ingredient {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "cat", default)]
    pub category: String,
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "q", default)]
    pub quantity: Quantity,
    #[serde(rename = "u", default)]
    pub unit: String,
    #[serde(default)]
    pub notes: String,
    /// Recipe reference
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Quantity>,
}

/// A piece of kitchen equipment needed for the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Equipment {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "d", default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecipeIngredient {
    pub id: String,
    /// Portion, e.g. "200g"
    #[serde(rename = "p", default)]
    pub portion: String,
    #[serde(rename = "d", default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Recipe {
    pub id: String,
    #[serde(rename = "n", default)]
    pub name: String,
    #[serde(rename = "s", default)]
    pub servings: u32,
    #[serde(rename = "i", default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(rename = "inst", default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// A single instruction inside a section.
///
/// Tasks carry no identifier of their own; see [`TaskId`] for the derived
/// identity used to track completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Task {
    /// Display time label, e.g. "10min" or "T+0:15"
    #[serde(rename = "t", default)]
    pub time: String,
    #[serde(rename = "i", default)]
    pub instruction: String,
    /// Upstream completion flag; completion is tracked by the session instead
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(rename = "pr", default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Explicit timer duration in minutes
    #[serde(rename = "td", default, skip_serializing_if = "Option::is_none")]
    pub timer_minutes: Option<u32>,
}

impl Task {
    /// Best-effort timer length for this task in seconds.
    ///
    /// An explicit positive `timer_minutes` wins. Otherwise the time label is
    /// scanned for an hour/minute duration such as `10min`, `1h`, `1h30` or
    /// `45 min`. Returns `None` when neither yields a positive duration or
    /// the label's number does not fit.
    pub fn timer_seconds(&self) -> Option<u64> {
        match self.timer_minutes {
            Some(minutes) if minutes > 0 => Some(u64::from(minutes) * 60),
            _ => parse_duration_label(&self.time),
        }
    }
}

/// Extracts the first `<n>h[<m>]` or `<n> min` duration from a label.
fn parse_duration_label(label: &str) -> Option<u64> {
    let lower = label.to_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let (value, after_number) = read_number(&chars, i);
        let unit_start = skip_spaces(&chars, after_number);
        let rest: String = chars[unit_start..].iter().collect();

        if rest.starts_with("min") || rest.starts_with("mn") {
            return value.checked_mul(60).filter(|&seconds| seconds > 0);
        }
        if rest.starts_with('h') {
            let minutes_start = unit_start + 1;
            let minutes = if chars.get(minutes_start).is_some_and(char::is_ascii_digit) {
                read_number(&chars, minutes_start).0
            } else {
                0
            };
            return value
                .checked_mul(3600)
                .zip(minutes.checked_mul(60))
                .and_then(|(hours, minutes)| hours.checked_add(minutes))
                .filter(|&total| total > 0);
        }

        i = after_number;
    }

    None
}

fn read_number(chars: &[char], start: usize) -> (u64, usize) {
    let mut end = start;
    let mut value: u64 = 0;
    while let Some(digit) = chars.get(end).and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(u64::from(digit));
        end += 1;
    }
    (value, end)
}

fn skip_spaces(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while chars.get(end).is_some_and(|c| c.is_whitespace()) {
        end += 1;
    }
    end
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Section {
    #[serde(rename = "n", default)]
    pub name: String,
    #[serde(rename = "t", default)]
    pub tasks: Vec<Task>,
}

/// One phase of the cooking session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Phase {
    /// Stable phase identifier, distinct from its list position
    pub num: String,
    #[serde(rename = "n", default)]
    pub name: String,
    #[serde(rename = "st", default)]
    pub start: String,
    #[serde(rename = "en", default)]
    pub end: String,
    #[serde(rename = "sec", default)]
    pub sections: Vec<Section>,
}

impl Phase {
    /// All tasks of this phase in section order, each with its derived id.
    pub fn tasks(&self) -> Vec<PhaseTask> {
        self.sections
            .iter()
            .enumerate()
            .flat_map(move |(section_index, section)| {
                section
                    .tasks
                    .iter()
                    .enumerate()
                    .map(move |(task_index, task)| PhaseTask {
                        id: TaskId::derive(&self.num, section_index, task_index),
                        section: section.name.clone(),
                        task: task.clone(),
                    })
            })
            .collect()
    }

    /// Derived ids of every task in this phase.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.sections
            .iter()
            .enumerate()
            .flat_map(move |(section_index, section)| {
                (0..section.tasks.len())
                    .map(move |task_index| TaskId::derive(&self.num, section_index, task_index))
            })
    }

    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|s| s.tasks.len()).sum()
    }
}

/// The phased task plan of a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BatchPlan {
    /// Total duration label
    #[serde(rename = "d", default)]
    pub duration: String,
    #[serde(rename = "p", default)]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Meta {
    #[serde(default)]
    pub week: u32,
    #[serde(default)]
    pub portions: u32,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub preparation_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conservation_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accompaniments: Vec<String>,
}

/// Complete plan document: ingredients, equipment, recipes, phased plan and
/// metadata. Immutable for the lifetime of a cooking session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlanDocument {
    #[serde(rename = "i", default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(rename = "e", default)]
    pub equipment: Vec<Equipment>,
    #[serde(rename = "r", default)]
    pub recipes: Vec<Recipe>,
    #[serde(rename = "b", default)]
    pub plan: BatchPlan,
    #[serde(default)]
    pub meta: Meta,
}

impl PlanDocument {
    pub fn phases(&self) -> &[Phase] {
        &self.plan.phases
    }

    pub fn phase(&self, num: &str) -> Option<&Phase> {
        self.plan.phases.iter().find(|p| p.num == num)
    }

    pub fn first_phase_num(&self) -> Option<&str> {
        self.plan.phases.first().map(|p| p.num.as_str())
    }

    /// Number of tasks across every phase.
    pub fn total_task_count(&self) -> usize {
        self.plan.phases.iter().map(Phase::task_count).sum()
    }

    /// Derived ids of every task across every phase.
    pub fn all_task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.plan.phases.iter().flat_map(Phase::task_ids)
    }
}
