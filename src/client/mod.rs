//! Consumer-side access to the stats service.
//!
//! [`StatsClient`] walks an ordered list of [`StatsApi`] backends, normally
//! the HTTP service followed by the local-storage fallback, and returns the
//! first answer. Callers cannot tell which backend replied.

mod http;
mod local;

pub use http::HttpStatsApi;
pub use local::{LocalOptions, LocalStatsApi, LAST_VISIT_INCREMENT_KEY};

use crate::errors::StoreError;
use crate::models::LikeStats;
use async_trait::async_trait;
use std::{future::Future, sync::Arc};
use tracing::{debug, warn};

/// Identity-free view of the counters: the backend decides who "I" am.
#[async_trait]
pub trait StatsApi: Send + Sync {
    fn name(&self) -> &'static str;

    async fn increment_visit(&self) -> Result<u64, StoreError>;

    async fn visit_count(&self) -> Result<u64, StoreError>;

    /// Flips the caller's like: `currently_liked == true` removes it.
    async fn toggle_like(&self, currently_liked: bool) -> Result<LikeStats, StoreError>;

    async fn like_stats(&self) -> Result<LikeStats, StoreError>;
}

#[derive(Clone)]
pub struct StatsClient {
    backends: Vec<Arc<dyn StatsApi>>,
}

impl StatsClient {
    pub fn new(backends: Vec<Arc<dyn StatsApi>>) -> Self {
        Self { backends }
    }

    /// The usual chain: the network service first, then the local store.
    pub fn with_fallback(remote: HttpStatsApi, local: LocalStatsApi) -> Self {
        Self::new(vec![Arc::new(remote), Arc::new(local)])
    }

    async fn first_success<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T, StoreError>
    where
        F: Fn(Arc<dyn StatsApi>) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        for backend in &self.backends {
            match call(Arc::clone(backend)).await {
                Ok(value) => {
                    debug!(backend = backend.name(), operation, "stats call answered");
                    return Ok(value);
                }
                Err(err) => {
                    warn!(backend = backend.name(), operation, "stats call failed: {err}");
                }
            }
        }
        Err(StoreError::Unavailable(format!(
            "no stats backend answered {operation}"
        )))
    }

    pub async fn increment_visit_or_default(&self) -> u64 {
        StatsApi::increment_visit(self).await.unwrap_or_default()
    }

    pub async fn visit_count_or_default(&self) -> u64 {
        StatsApi::visit_count(self).await.unwrap_or_default()
    }

    pub async fn toggle_like_or_default(&self, currently_liked: bool) -> LikeStats {
        StatsApi::toggle_like(self, currently_liked)
            .await
            .unwrap_or_default()
    }

    pub async fn like_stats_or_default(&self) -> LikeStats {
        StatsApi::like_stats(self).await.unwrap_or_default()
    }
}

/// Errors only when every backend in the chain failed.
#[async_trait]
impl StatsApi for StatsClient {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn increment_visit(&self) -> Result<u64, StoreError> {
        self.first_success("increment_visit", |api| async move {
            api.increment_visit().await
        })
        .await
    }

    async fn visit_count(&self) -> Result<u64, StoreError> {
        self.first_success("visit_count", |api| async move { api.visit_count().await })
            .await
    }

    async fn toggle_like(&self, currently_liked: bool) -> Result<LikeStats, StoreError> {
        self.first_success("toggle_like", |api| async move {
            api.toggle_like(currently_liked).await
        })
        .await
    }

    async fn like_stats(&self) -> Result<LikeStats, StoreError> {
        self.first_success("like_stats", |api| async move { api.like_stats().await })
            .await
    }
}
