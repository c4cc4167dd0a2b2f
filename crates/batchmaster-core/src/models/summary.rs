//! Plan summary types for browsing available plans.

use serde::{Deserialize, Serialize};

/// Catalogue entry shown while browsing plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Plan ID
    pub id: String,
    /// Title of the plan
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    /// Human readable effort, e.g. "2h30"
    #[serde(default)]
    pub time_estimate: String,
    #[serde(default)]
    pub recipe_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub is_new: bool,
}
