//! Owners of the visit counter and the like set.
//!
//! Every backend answers the same four operations, so the service and the
//! local fallback can be handed any of them behind an `Arc<dyn CounterStore>`.

mod file;
mod local;
mod memory;

pub use file::FileStore;
pub use local::{LocalStore, GLOBAL_LIKES_KEY, GLOBAL_VISIT_COUNT_KEY};
pub use memory::MemoryStore;

use crate::errors::StoreError;
use crate::models::{LikeStats, StatsData};
use async_trait::async_trait;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current visit count, without side effects.
    async fn visit_count(&self) -> Result<u64, StoreError>;

    /// Adds one visit and returns the new count.
    async fn increment_visit(&self) -> Result<u64, StoreError>;

    async fn like_stats(&self, client_id: &str) -> Result<LikeStats, StoreError>;

    /// Adds or removes `client_id`. Repeating the same call is a no-op that
    /// still reports the current snapshot.
    async fn set_like(&self, client_id: &str, liked: bool) -> Result<LikeStats, StoreError>;
}

pub(crate) fn like_snapshot(data: &StatsData, client_id: &str) -> LikeStats {
    LikeStats {
        count: data.likes.len() as u64,
        is_liked: data.likes.contains(client_id),
    }
}

pub(crate) fn apply_like(data: &mut StatsData, client_id: &str, liked: bool) -> bool {
    if liked {
        data.likes.insert(client_id.to_string())
    } else {
        data.likes.remove(client_id)
    }
}
