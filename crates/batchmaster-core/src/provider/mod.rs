//! Plan data sources.
//!
//! A [`PlanProvider`] returns plan documents and the plan catalogue. The
//! concrete sources are an HTTP API ([`HttpPlanProvider`]) and a directory of
//! JSON files ([`DirectoryPlanProvider`]); either can be wrapped in
//! [`CachedPlanProvider`] for time-based caching with offline fallback.

use std::fmt;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{PlanDocument, PlanSummary},
};

pub mod cache;
pub mod directory;
pub mod http;

pub use cache::{CacheOptions, CachedPlanProvider};
pub use directory::DirectoryPlanProvider;
pub use http::HttpPlanProvider;

/// Opaque source of plan documents.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Fetches the full document of the plan with the given opaque id.
    async fn fetch_plan_by_id(&self, id: &str) -> Result<PlanDocument>;

    /// Fetches the catalogue of available plans.
    async fn fetch_plans_summary(&self) -> Result<Vec<PlanSummary>>;

    /// Fetches the plan document published for a week number.
    async fn fetch_week_data(&self, week: u32) -> Result<PlanDocument>;
}

/// How a plan identifier should be looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRef {
    /// Purely numeric identifiers name a week
    Week(u32),
    Id(String),
}

impl PlanRef {
    pub fn parse(id: &str) -> Self {
        let trimmed = id.trim();
        match trimmed.parse::<u32>() {
            Ok(week) if trimmed.chars().all(|c| c.is_ascii_digit()) => PlanRef::Week(week),
            _ => PlanRef::Id(id.to_string()),
        }
    }
}

impl fmt::Display for PlanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanRef::Week(week) => write!(f, "week {week}"),
            PlanRef::Id(id) => write!(f, "plan {id}"),
        }
    }
}

/// Fetches a plan document, routing numeric ids to the week lookup.
pub async fn fetch_plan<P>(provider: &P, id: &str) -> Result<PlanDocument>
where
    P: PlanProvider + ?Sized,
{
    match PlanRef::parse(id) {
        PlanRef::Week(week) => provider.fetch_week_data(week).await,
        PlanRef::Id(id) => provider.fetch_plan_by_id(&id).await,
    }
}
