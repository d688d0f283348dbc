//! Test doubles for the game engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Barrier;

use super::clock::Clock;
use super::ledger::User;
use super::provider::{Lookup, ProviderError, SimilarityProvider, SimilarityRecord};
use crate::kv::{KvStore, MemoryStore, StoreError};

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: format!("user-{}", id),
    }
}

pub fn record(similarity: f64, percentile: Option<u16>) -> SimilarityRecord {
    SimilarityRecord {
        similarity,
        percentile,
        raw: serde_json::json!({ "similarity": similarity, "percentile": percentile }),
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Provider with canned answers that counts outbound calls.
/// Words without an answer are unknown.
#[derive(Default)]
pub struct ScriptedProvider {
    answers: HashMap<String, Result<Lookup, ProviderError>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(mut self, word: &str, similarity: f64, percentile: Option<u16>) -> Self {
        self.answers.insert(
            word.to_string(),
            Ok(Lookup::Found(record(similarity, percentile))),
        );
        self
    }

    pub fn failing(mut self, word: &str, err: ProviderError) -> Self {
        self.answers.insert(word.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SimilarityProvider for ScriptedProvider {
    async fn similarity(&self, _secret: &str, word: &str) -> Result<Lookup, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .get(word)
            .cloned()
            .unwrap_or(Ok(Lookup::UnknownWord))
    }
}

/// Store that simulates another writer landing between a read and a write.
///
/// On the first compare-and-swap of `key`, `rival` is written to the inner
/// store before the swap is attempted.
pub struct RacingStore {
    inner: MemoryStore,
    key: String,
    rival: Vec<u8>,
    fired: AtomicBool,
    always_conflict: bool,
}

impl RacingStore {
    pub fn new(inner: MemoryStore, key: &str, rival: Vec<u8>) -> Self {
        Self {
            inner,
            key: key.to_string(),
            rival,
            fired: AtomicBool::new(false),
            always_conflict: false,
        }
    }

    /// Every compare-and-swap loses.
    pub fn always_conflicting(inner: MemoryStore) -> Self {
        Self {
            inner,
            key: String::new(),
            rival: Vec::new(),
            fired: AtomicBool::new(true),
            always_conflict: true,
        }
    }
}

#[async_trait]
impl KvStore for RacingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.put(key, value).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool, StoreError> {
        if self.always_conflict {
            return Ok(false);
        }
        if key == self.key && !self.fired.swap(true, Ordering::SeqCst) {
            self.inner.put(key, self.rival.clone()).await?;
        }
        self.inner.compare_and_swap(key, expected, value).await
    }
}

/// Store that holds the first `writers` compare-and-swaps at a barrier until
/// all of them have arrived, so every writer swaps against what it read
/// before any of them landed. Counts the swaps that were rejected.
pub struct GatedStore {
    inner: MemoryStore,
    writers: usize,
    gate: Barrier,
    arrivals: AtomicUsize,
    rejected: AtomicUsize,
}

impl GatedStore {
    pub fn new(inner: MemoryStore, writers: usize) -> Self {
        Self {
            inner,
            writers,
            gate: Barrier::new(writers),
            arrivals: AtomicUsize::new(0),
            rejected: AtomicUsize::new(0),
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KvStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.put(key, value).await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool, StoreError> {
        if self.arrivals.fetch_add(1, Ordering::SeqCst) < self.writers {
            self.gate.wait().await;
        }
        let swapped = self.inner.compare_and_swap(key, expected, value).await?;
        if !swapped {
            self.rejected.fetch_add(1, Ordering::SeqCst);
        }
        Ok(swapped)
    }
}
