//! REST plan source.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::PlanProvider;
use crate::{
    error::{Result, ResultExt, SessionError},
    models::{PlanDocument, PlanSummary},
};

/// Plan source backed by the batch cooking REST API:
/// `GET /plans`, `GET /plans/{id}` and `GET /weeks/{n}`.
#[derive(Debug, Clone)]
pub struct HttpPlanProvider {
    client: Client,
    base_url: String,
}

impl HttpPlanProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .with_context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::fetch(format!("{url} returned {status}")));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PlanProvider for HttpPlanProvider {
    async fn fetch_plan_by_id(&self, id: &str) -> Result<PlanDocument> {
        self.get_json(&format!("/plans/{id}")).await
    }

    async fn fetch_plans_summary(&self) -> Result<Vec<PlanSummary>> {
        self.get_json("/plans").await
    }

    async fn fetch_week_data(&self, week: u32) -> Result<PlanDocument> {
        self.get_json(&format!("/weeks/{week}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let provider = HttpPlanProvider::new("https://api.example.com/", Duration::from_secs(1))
            .expect("client builds");
        assert_eq!(provider.base_url(), "https://api.example.com");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let provider = HttpPlanProvider::new("http://127.0.0.1:9", Duration::from_millis(200))
            .expect("client builds");
        let err = provider
            .fetch_plans_summary()
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, SessionError::Fetch { .. }));
    }
}
