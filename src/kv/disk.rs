use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use cnidarium::{StateDelta, StateRead, StateWrite, Storage};
use tokio::sync::Mutex;
use tracing::debug;

use super::{KvStore, StoreError, GUESSES_PREFIX, SIMILARITY_PREFIX};

/// On-disk store backed by cnidarium.
pub struct CnidariumStore {
    storage: Storage,
    /// Serializes commits so a read-compare-commit is atomic within the process.
    write_lock: Mutex<()>,
}

fn backend(err: anyhow::Error) -> StoreError {
    StoreError::Backend(format!("{:#}", err))
}

impl CnidariumStore {
    pub async fn new(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let prefixes = vec![SIMILARITY_PREFIX.to_string(), GUESSES_PREFIX.to_string()];
        let storage = Storage::load(data_dir.to_path_buf(), prefixes)
            .await
            .context("Failed to init cnidarium storage")?;
        Ok(Self {
            storage,
            write_lock: Mutex::new(()),
        })
    }

    async fn commit(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let snapshot = self.storage.latest_snapshot();
        let mut delta = StateDelta::new(snapshot);
        delta.put_raw(key.to_string(), value);
        self.storage.commit(delta).await.map_err(backend)?;
        debug!(key, "record committed");
        Ok(())
    }
}

#[async_trait]
impl KvStore for CnidariumStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let snapshot = self.storage.latest_snapshot();
        snapshot.get_raw(key).await.map_err(backend)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.commit(key, value).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let current = self.get(key).await?;
        if current.as_deref() != expected {
            debug!(key, "compare-and-swap rejected");
            return Ok(false);
        }
        self.commit(key, value).await?;
        Ok(true)
    }
}
