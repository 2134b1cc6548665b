//! String key/value persistence in the shape of browser local/session storage.

use crate::errors::StoreError;
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::error;

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Lives as long as the process; stands in for session storage.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.items.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

/// Survives restarts by rewriting a JSON object on every write.
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let items = load_items(&path).await;
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut items = self.items.lock().await;
        let previous = items.insert(key.to_string(), value);
        let payload = serde_json::to_vec_pretty(&*items)?;
        if let Err(err) = fs::write(&self.path, payload).await {
            match previous {
                Some(previous) => items.insert(key.to_string(), previous),
                None => items.remove(key),
            };
            return Err(err.into());
        }
        Ok(())
    }
}

async fn load_items(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                error!("failed to parse storage file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read storage file: {err}");
            BTreeMap::new()
        }
    }
}
