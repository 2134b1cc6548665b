use super::StatsApi;
use crate::errors::StoreError;
use crate::identity::browser_client_id;
use crate::models::LikeStats;
use crate::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::store::{CounterStore, LocalStore};
use async_trait::async_trait;
use chrono::Utc;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{debug, warn};

pub const LAST_VISIT_INCREMENT_KEY: &str = "lastVisitIncrement";

#[derive(Debug, Clone, Copy)]
pub struct LocalOptions {
    /// Minimum gap between two accepted increments in one session.
    pub debounce: Duration,
    pub read_latency: Duration,
    pub toggle_latency: Duration,
}

impl Default for LocalOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(2000),
            read_latency: Duration::from_millis(10),
            toggle_latency: Duration::from_millis(100),
        }
    }
}

/// Fallback backend kept entirely in the browser: counters in local
/// storage, the debounce timestamp in session storage.
pub struct LocalStatsApi {
    store: LocalStore,
    local: Arc<dyn KeyValueStorage>,
    session: Arc<dyn KeyValueStorage>,
    options: LocalOptions,
}

impl LocalStatsApi {
    pub fn new(
        local: Arc<dyn KeyValueStorage>,
        session: Arc<dyn KeyValueStorage>,
        options: LocalOptions,
    ) -> Self {
        Self {
            store: LocalStore::new(Arc::clone(&local)),
            local,
            session,
            options,
        }
    }

    /// Local storage in a JSON file that outlives the process, with a fresh
    /// in-memory session, like a browser reopened on the same profile.
    pub async fn persistent(
        path: impl Into<PathBuf>,
        options: LocalOptions,
    ) -> Result<Self, StoreError> {
        let local = FileStorage::open(path).await?;
        Ok(Self::new(
            Arc::new(local),
            Arc::new(MemoryStorage::new()),
            options,
        ))
    }

    async fn pause(duration: Duration) {
        if !duration.is_zero() {
            sleep(duration).await;
        }
    }

    async fn within_debounce(&self, now: i64) -> Result<bool, StoreError> {
        let last = self
            .session
            .get_item(LAST_VISIT_INCREMENT_KEY)
            .await?
            .and_then(|value| value.parse::<i64>().ok());
        let window = self.options.debounce.as_millis() as i64;
        Ok(matches!(last, Some(last) if now - last < window))
    }
}

#[async_trait]
impl StatsApi for LocalStatsApi {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn increment_visit(&self) -> Result<u64, StoreError> {
        Self::pause(self.options.read_latency).await;

        let now = Utc::now().timestamp_millis();
        if self.within_debounce(now).await? {
            debug!("visit increment debounced");
            return self.store.visit_count().await;
        }

        self.session
            .set_item(LAST_VISIT_INCREMENT_KEY, now.to_string())
            .await?;
        match self.store.increment_visit().await {
            Ok(count) => Ok(count),
            Err(err) => {
                warn!("local visit increment failed: {err}");
                self.store.visit_count().await
            }
        }
    }

    async fn visit_count(&self) -> Result<u64, StoreError> {
        Self::pause(self.options.read_latency).await;
        self.store.visit_count().await
    }

    async fn toggle_like(&self, currently_liked: bool) -> Result<LikeStats, StoreError> {
        Self::pause(self.options.toggle_latency).await;
        let client_id = browser_client_id(self.local.as_ref()).await?;
        self.store.set_like(&client_id, !currently_liked).await
    }

    async fn like_stats(&self) -> Result<LikeStats, StoreError> {
        Self::pause(self.options.read_latency).await;
        let client_id = browser_client_id(self.local.as_ref()).await?;
        self.store.like_stats(&client_id).await
    }
}
