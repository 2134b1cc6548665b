use super::CounterStore;
use crate::errors::StoreError;
use crate::models::LikeStats;
use crate::storage::KeyValueStorage;
use async_trait::async_trait;
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::Mutex;
use tracing::warn;

pub const GLOBAL_VISIT_COUNT_KEY: &str = "globalVisitCount";
pub const GLOBAL_LIKES_KEY: &str = "globalLikes";

/// Counter store kept in a browser-style key/value storage: the count as a
/// decimal string and the likers as a JSON array.
pub struct LocalStore {
    storage: Arc<dyn KeyValueStorage>,
    // Serializes read-modify-write cycles against the storage.
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    async fn load_count(&self) -> Result<u64, StoreError> {
        let raw = self.storage.get_item(GLOBAL_VISIT_COUNT_KEY).await?;
        Ok(raw.as_deref().map(parse_leading_count).unwrap_or(0))
    }

    async fn load_likes(&self) -> Result<BTreeSet<String>, StoreError> {
        let Some(raw) = self.storage.get_item(GLOBAL_LIKES_KEY).await? else {
            return Ok(BTreeSet::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Ok(ids.into_iter().collect()),
            Err(err) => {
                warn!("discarding unreadable like set: {err}");
                Ok(BTreeSet::new())
            }
        }
    }

    async fn save_likes(&self, likes: &BTreeSet<String>) -> Result<(), StoreError> {
        let ids: Vec<&String> = likes.iter().collect();
        self.storage
            .set_item(GLOBAL_LIKES_KEY, serde_json::to_string(&ids)?)
            .await
    }
}

/// Reads the leading run of digits, so `"12abc"` is 12. Anything without
/// one, negatives included, counts as 0.
fn parse_leading_count(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(0)
}

#[async_trait]
impl CounterStore for LocalStore {
    async fn visit_count(&self) -> Result<u64, StoreError> {
        self.load_count().await
    }

    async fn increment_visit(&self) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;
        let next = self.load_count().await?.saturating_add(1);
        self.storage
            .set_item(GLOBAL_VISIT_COUNT_KEY, next.to_string())
            .await?;
        Ok(next)
    }

    async fn like_stats(&self, client_id: &str) -> Result<LikeStats, StoreError> {
        let likes = self.load_likes().await?;
        Ok(LikeStats {
            count: likes.len() as u64,
            is_liked: likes.contains(client_id),
        })
    }

    async fn set_like(&self, client_id: &str, liked: bool) -> Result<LikeStats, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut likes = self.load_likes().await?;
        let changed = if liked {
            likes.insert(client_id.to_string())
        } else {
            likes.remove(client_id)
        };
        if changed {
            self.save_likes(&likes).await?;
        }
        Ok(LikeStats {
            count: likes.len() as u64,
            is_liked: likes.contains(client_id),
        })
    }
}
