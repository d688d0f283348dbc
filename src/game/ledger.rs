use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::SimilarityRecord;
use crate::kv::{guesses_key, KvStore, StoreError};

/// How many times an append re-reads after losing a compare-and-swap race.
pub const MAX_APPEND_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// One recorded guess. `guess_number` is the submission order and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    pub user: User,
    pub guess_number: u32,
    pub word: String,
    pub similarity: f64,
    #[serde(default)]
    pub percentile: Option<u16>,
}

/// Result of [`GuessLedger::append`].
#[derive(Debug, Clone)]
pub struct Appended {
    /// The new guess, or the existing one when `inserted` is false.
    pub guess: Guess,
    /// The full ledger after the call, best guess first.
    pub guesses: Vec<Guess>,
    pub inserted: bool,
}

/// Collapse whitespace runs to `_`. Case is kept as submitted.
pub fn normalize_word(word: &str) -> String {
    word.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Add `word` to `guesses` unless already present, then re-rank.
///
/// Returns the guess for `word` and whether it was inserted. The sort is
/// stable, so equal similarities keep submission order.
fn insert_ranked(
    guesses: &mut Vec<Guess>,
    user: &User,
    word: &str,
    record: &SimilarityRecord,
) -> (Guess, bool) {
    if let Some(existing) = guesses.iter().find(|g| g.word == word) {
        return (existing.clone(), false);
    }

    let guess = Guess {
        user: user.clone(),
        guess_number: guesses.len() as u32 + 1,
        word: word.to_string(),
        similarity: record.similarity,
        percentile: record.percentile,
    };
    guesses.push(guess.clone());
    guesses.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    (guess, true)
}

/// Ranked guesses per (channel, puzzle), stored as one JSON record per key.
#[derive(Clone)]
pub struct GuessLedger {
    store: Arc<dyn KvStore>,
}

impl GuessLedger {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn read(&self, channel_id: &str, secret: &str) -> Result<Vec<Guess>, StoreError> {
        let key = guesses_key(channel_id, secret);
        let (_, guesses) = self.read_raw(&key).await?;
        Ok(guesses)
    }

    async fn read_raw(&self, key: &str) -> Result<(Option<Vec<u8>>, Vec<Guess>), StoreError> {
        let Some(bytes) = self.store.get(key).await? else {
            return Ok((None, Vec::new()));
        };
        let guesses = serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok((Some(bytes), guesses))
    }

    /// Record a guess. A word already in the ledger is a no-op.
    ///
    /// The whole ledger is rewritten with compare-and-swap against the bytes
    /// it was computed from; a lost race re-reads and starts over, so a
    /// concurrent writer's guess is never dropped.
    pub async fn append(
        &self,
        channel_id: &str,
        secret: &str,
        user: &User,
        word: &str,
        record: &SimilarityRecord,
    ) -> Result<Appended, StoreError> {
        let key = guesses_key(channel_id, secret);
        let word = normalize_word(word);

        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let (snapshot, mut guesses) = self.read_raw(&key).await?;

            let (guess, inserted) = insert_ranked(&mut guesses, user, &word, record);
            if !inserted {
                return Ok(Appended {
                    guess,
                    guesses,
                    inserted,
                });
            }

            let bytes = serde_json::to_vec(&guesses).map_err(|e| StoreError::Corrupt {
                key: key.clone(),
                reason: e.to_string(),
            })?;

            if self
                .store
                .compare_and_swap(&key, snapshot.as_deref(), bytes)
                .await?
            {
                debug!(
                    channel_id,
                    word = %guess.word,
                    guess_number = guess.guess_number,
                    "guess recorded"
                );
                return Ok(Appended {
                    guess,
                    guesses,
                    inserted,
                });
            }

            warn!(channel_id, word = %word, attempt, "ledger changed underneath append, retrying");
        }

        Err(StoreError::Conflict(key))
    }
}
