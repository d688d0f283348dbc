use std::sync::Arc;

use tracing::debug;

use super::provider::{Lookup, SimilarityProvider};
use super::GameError;
use crate::kv::{similarity_key, KvStore, StoreError};

/// Memoizes provider lookups in the store, forever, including unknown words.
///
/// A provider error is never cached, so the next identical guess retries it.
#[derive(Clone)]
pub struct SimilarityCache {
    store: Arc<dyn KvStore>,
    provider: Arc<dyn SimilarityProvider>,
}

impl SimilarityCache {
    pub fn new(store: Arc<dyn KvStore>, provider: Arc<dyn SimilarityProvider>) -> Self {
        Self { store, provider }
    }

    pub async fn lookup(&self, secret: &str, word: &str) -> Result<Lookup, GameError> {
        let key = similarity_key(secret, word);

        if let Some(bytes) = self.store.get(&key).await? {
            let cached: Lookup =
                serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
            debug!(secret, word, "similarity cache hit");
            return Ok(cached);
        }

        debug!(secret, word, "similarity cache miss");
        let lookup = self.provider.similarity(secret, word).await?;

        let bytes = serde_json::to_vec(&lookup).map_err(|e| StoreError::Corrupt {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.store.put(&key, bytes).await?;

        Ok(lookup)
    }
}
