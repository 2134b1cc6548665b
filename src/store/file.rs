use super::{apply_like, like_snapshot, CounterStore};
use crate::errors::StoreError;
use crate::models::{LikeStats, StatsData};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{error, info};

/// JSON-file backed store. Each mutation is written out before it becomes
/// visible, so a failed write leaves the previous state in place.
pub struct FileStore {
    path: PathBuf,
    data: Mutex<StatsData>,
}

impl FileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let data = load_data(&path).await;
        info!(
            "loaded stats from {}: {} visits, {} likes",
            path.display(),
            data.visit_count,
            data.likes.len()
        );
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }
}

#[async_trait]
impl CounterStore for FileStore {
    async fn visit_count(&self) -> Result<u64, StoreError> {
        Ok(self.data.lock().await.visit_count)
    }

    async fn increment_visit(&self) -> Result<u64, StoreError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        next.visit_count = next.visit_count.saturating_add(1);
        persist_data(&self.path, &next).await?;
        *data = next;
        Ok(data.visit_count)
    }

    async fn like_stats(&self, client_id: &str) -> Result<LikeStats, StoreError> {
        Ok(like_snapshot(&*self.data.lock().await, client_id))
    }

    async fn set_like(&self, client_id: &str, liked: bool) -> Result<LikeStats, StoreError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        if apply_like(&mut next, client_id, liked) {
            persist_data(&self.path, &next).await?;
            *data = next;
        }
        Ok(like_snapshot(&data, client_id))
    }
}

async fn load_data(path: &Path) -> StatsData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse stats file: {err}");
                StatsData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => StatsData::default(),
        Err(err) => {
            error!("failed to read stats file: {err}");
            StatsData::default()
        }
    }
}

async fn persist_data(path: &Path, data: &StatsData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await.map_err(|err| {
        error!("failed to write stats file {}: {err}", path.display());
        StoreError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    #[tokio::test]
    async fn file_store_counts_visits() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("stats.json")).await.unwrap();
        contract::visits_increase_by_one(&store).await;
    }

    #[tokio::test]
    async fn file_store_toggles_likes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("a.json")).await.unwrap();
        contract::likes_toggle_idempotently(&store).await;
        let store = FileStore::open(dir.path().join("b.json")).await.unwrap();
        contract::likes_are_per_client(&store).await;
    }

    #[tokio::test]
    async fn file_store_reloads_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/stats.json");

        let store = FileStore::open(&path).await.unwrap();
        store.increment_visit().await.unwrap();
        store.increment_visit().await.unwrap();
        store.set_like("10.0.0.1", true).await.unwrap();
        drop(store);

        let reopened = FileStore::open(&path).await.unwrap();
        assert_eq!(reopened.visit_count().await.unwrap(), 2);
        let stats = reopened.like_stats("10.0.0.1").await.unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.is_liked);
    }

    #[tokio::test]
    async fn unwritable_file_reports_unavailable_and_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the data path makes every write fail.
        let path = dir.path().join("stats.json");
        std::fs::create_dir(&path).unwrap();

        let store = FileStore::open(&path).await.unwrap();
        let err = store.increment_visit().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.visit_count().await.unwrap(), 0);

        let err = store.set_like("A", true).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.like_stats("A").await.unwrap().count, 0);
    }
}
