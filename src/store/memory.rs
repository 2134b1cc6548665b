use super::{apply_like, like_snapshot, CounterStore};
use crate::errors::StoreError;
use crate::models::{LikeStats, StatsData};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Process-lifetime store; state resets on restart.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<StatsData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn visit_count(&self) -> Result<u64, StoreError> {
        Ok(self.data.lock().await.visit_count)
    }

    async fn increment_visit(&self) -> Result<u64, StoreError> {
        let mut data = self.data.lock().await;
        data.visit_count = data.visit_count.saturating_add(1);
        Ok(data.visit_count)
    }

    async fn like_stats(&self, client_id: &str) -> Result<LikeStats, StoreError> {
        Ok(like_snapshot(&*self.data.lock().await, client_id))
    }

    async fn set_like(&self, client_id: &str, liked: bool) -> Result<LikeStats, StoreError> {
        let mut data = self.data.lock().await;
        apply_like(&mut data, client_id, liked);
        Ok(like_snapshot(&data, client_id))
    }
}
