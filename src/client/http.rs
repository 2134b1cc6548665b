use super::StatsApi;
use crate::app::{LIKE_PATH, VISIT_PATH};
use crate::errors::StoreError;
use crate::models::{LikeAction, LikeRequest, LikeStats, VisitStats};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Talks to the stats service over HTTP.
pub struct HttpStatsApi {
    client: Client,
    base_url: String,
}

impl HttpStatsApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Transport(format!("unexpected status {status}")));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl StatsApi for HttpStatsApi {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn increment_visit(&self) -> Result<u64, StoreError> {
        let stats: VisitStats = self.fetch(self.client.post(self.url(VISIT_PATH))).await?;
        Ok(stats.count)
    }

    async fn visit_count(&self) -> Result<u64, StoreError> {
        let stats: VisitStats = self.fetch(self.client.get(self.url(VISIT_PATH))).await?;
        Ok(stats.count)
    }

    async fn toggle_like(&self, currently_liked: bool) -> Result<LikeStats, StoreError> {
        let action = if currently_liked {
            LikeAction::Remove
        } else {
            LikeAction::Add
        };
        let body = LikeRequest {
            action: Some(action.as_str().to_string()),
        };
        self.fetch(self.client.post(self.url(LIKE_PATH)).json(&body))
            .await
    }

    async fn like_stats(&self) -> Result<LikeStats, StoreError> {
        self.fetch(self.client.get(self.url(LIKE_PATH))).await
    }
}
