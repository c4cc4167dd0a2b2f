//! Plan source reading JSON files from a local directory.
//!
//! Layout: `plans.json` holds the catalogue, `<id>.json` a plan by id and
//! `week-<n>.json` the plan of week `n`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::PlanProvider;
use crate::{
    error::{Result, SessionError},
    models::{PlanDocument, PlanSummary},
};

const CATALOGUE_FILE: &str = "plans.json";

#[derive(Debug, Clone)]
pub struct DirectoryPlanProvider {
    root: PathBuf,
}

impl DirectoryPlanProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, file_name: &str) -> Result<T> {
        if file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(SessionError::invalid_input("plan_id")
                .with_reason(format!("'{file_name}' is not a valid plan file name")));
        }

        let path = self.root.join(file_name);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SessionError::fetch(format!("{}: {e}", path.display())))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl PlanProvider for DirectoryPlanProvider {
    async fn fetch_plan_by_id(&self, id: &str) -> Result<PlanDocument> {
        self.read_json(&format!("{id}.json")).await
    }

    async fn fetch_plans_summary(&self) -> Result<Vec<PlanSummary>> {
        self.read_json(CATALOGUE_FILE).await
    }

    async fn fetch_week_data(&self, week: u32) -> Result<PlanDocument> {
        self.read_json(&format!("week-{week}.json")).await
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_reads_plan_and_catalogue() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("plans.json"),
            r#"[{"id": "spring", "title": "Spring week"}]"#,
        )
        .expect("write catalogue");
        std::fs::write(
            dir.path().join("spring.json"),
            r#"{"b": {"d": "1h", "p": [{"num": "1", "n": "Prep", "sec": []}]}}"#,
        )
        .expect("write plan");

        let provider = DirectoryPlanProvider::new(dir.path());
        let plans = provider.fetch_plans_summary().await.expect("catalogue");
        assert_eq!(plans[0].title, "Spring week");

        let doc = provider.fetch_plan_by_id("spring").await.expect("plan");
        assert_eq!(doc.first_phase_num(), Some("1"));

        let missing = provider.fetch_week_data(3).await;
        assert!(matches!(missing, Err(SessionError::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let provider = DirectoryPlanProvider::new(dir.path());
        let err = provider
            .fetch_plan_by_id("../secrets")
            .await
            .expect_err("traversal rejected");
        assert!(matches!(err, SessionError::InvalidInput { .. }));
    }
}
