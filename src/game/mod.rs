pub mod cache;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod provider;
pub mod words;

#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use futures::TryFutureExt;
use tracing::info;

use crate::kv::KvStore;

pub use cache::SimilarityCache;
pub use clock::{Clock, PuzzleClock, PuzzleDay, SystemClock};
pub use error::GameError;
pub use ledger::{normalize_word, Guess, GuessLedger, User};
pub use provider::{Lookup, ProviderError, SimilarityProvider, SimilarityRecord, FOUND_PERCENTILE};
pub use words::WordList;

/// Outcome of one guess. Exactly one is produced per call.
#[derive(Debug, Clone, PartialEq)]
pub enum GameResult {
    /// The provider doesn't know the word. Nothing was recorded.
    Unknown,
    /// Already guessed this puzzle. `guess` is the original entry.
    Duplicate { guess: Guess, guesses: Vec<Guess> },
    /// Exact match with the secret.
    Found { guess: Guess, guesses: Vec<Guess> },
    /// Within the provider's top 1000 but not the secret.
    Warm { guess: Guess, guesses: Vec<Guess> },
    /// No percentile at all.
    Cold { guess: Guess, guesses: Vec<Guess> },
}

impl GameResult {
    fn classify(guess: Guess, guesses: Vec<Guess>) -> Self {
        match guess.percentile {
            Some(FOUND_PERCENTILE) => GameResult::Found { guess, guesses },
            Some(_) => GameResult::Warm { guess, guesses },
            None => GameResult::Cold { guess, guesses },
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GameResult::Unknown => "unknown",
            GameResult::Duplicate { .. } => "duplicate",
            GameResult::Found { .. } => "found",
            GameResult::Warm { .. } => "warm",
            GameResult::Cold { .. } => "cold",
        }
    }

    pub fn guess(&self) -> Option<&Guess> {
        match self {
            GameResult::Unknown => None,
            GameResult::Duplicate { guess, .. }
            | GameResult::Found { guess, .. }
            | GameResult::Warm { guess, .. }
            | GameResult::Cold { guess, .. } => Some(guess),
        }
    }

    pub fn guesses(&self) -> &[Guess] {
        match self {
            GameResult::Unknown => &[],
            GameResult::Duplicate { guesses, .. }
            | GameResult::Found { guesses, .. }
            | GameResult::Warm { guesses, .. }
            | GameResult::Cold { guesses, .. } => guesses,
        }
    }
}

/// Progress of one channel on one puzzle day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoGuesses,
    InProgress,
    Found,
}

impl SessionState {
    fn of(guesses: &[Guess]) -> Self {
        if guesses.is_empty() {
            SessionState::NoGuesses
        } else if guesses
            .iter()
            .any(|g| g.percentile == Some(FOUND_PERCENTILE))
        {
            SessionState::Found
        } else {
            SessionState::InProgress
        }
    }
}

/// Where a channel stands, with the ledger it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStatus {
    pub state: SessionState,
    /// Best guess first.
    pub guesses: Vec<Guess>,
}

impl GameStatus {
    /// The guess that hit the secret, if any.
    pub fn winner(&self) -> Option<&Guess> {
        self.guesses
            .iter()
            .find(|g| g.percentile == Some(FOUND_PERCENTILE))
    }
}

/// Read-only summary shown when a player gives up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveUpReport {
    pub secret: String,
    pub guess_count: usize,
    pub time_until_next_ms: i64,
}

/// Shared handles for building per-request sessions.
#[derive(Clone)]
pub struct Games {
    cache: SimilarityCache,
    ledger: GuessLedger,
    clock: PuzzleClock,
}

impl Games {
    pub fn new(
        store: Arc<dyn KvStore>,
        provider: Arc<dyn SimilarityProvider>,
        clock: PuzzleClock,
    ) -> Self {
        Self {
            cache: SimilarityCache::new(store.clone(), provider),
            ledger: GuessLedger::new(store),
            clock,
        }
    }

    pub fn today_for_channel(&self, channel_id: &str) -> Result<GameSession, GameError> {
        Ok(self.session(channel_id, self.clock.today()?))
    }

    pub fn yesterday_for_channel(&self, channel_id: &str) -> Result<GameSession, GameError> {
        Ok(self.session(channel_id, self.clock.previous()?))
    }

    fn session(&self, channel_id: &str, day: PuzzleDay) -> GameSession {
        GameSession {
            channel_id: channel_id.to_string(),
            day,
            cache: self.cache.clone(),
            ledger: self.ledger.clone(),
        }
    }
}

/// One channel's game for one puzzle day. Holds no state of its own beyond
/// the resolved puzzle; everything else lives in the store.
pub struct GameSession {
    channel_id: String,
    day: PuzzleDay,
    cache: SimilarityCache,
    ledger: GuessLedger,
}

impl GameSession {
    pub fn secret(&self) -> &str {
        &self.day.secret_word
    }

    pub fn time_since_start_ms(&self) -> i64 {
        self.day.time_since_start_ms
    }

    pub fn time_until_next_ms(&self) -> i64 {
        self.day.time_until_next_ms
    }

    pub async fn get_guesses(&self) -> Result<Vec<Guess>, GameError> {
        Ok(self.ledger.read(&self.channel_id, self.secret()).await?)
    }

    pub async fn status(&self) -> Result<GameStatus, GameError> {
        let guesses = self.get_guesses().await?;
        Ok(GameStatus {
            state: SessionState::of(&guesses),
            guesses,
        })
    }

    /// Giving up changes nothing; it only reveals the secret.
    pub async fn give_up(&self) -> Result<GiveUpReport, GameError> {
        let guesses = self.get_guesses().await?;
        Ok(GiveUpReport {
            secret: self.secret().to_string(),
            guess_count: guesses.len(),
            time_until_next_ms: self.time_until_next_ms(),
        })
    }

    pub async fn guess(&self, user: &User, word: &str) -> Result<GameResult, GameError> {
        let word = normalize_word(word);
        if word.is_empty() {
            return Ok(GameResult::Unknown);
        }
        let secret = self.secret();

        let (lookup, guesses) = futures::try_join!(
            self.cache.lookup(secret, &word),
            self.ledger
                .read(&self.channel_id, secret)
                .err_into::<GameError>(),
        )?;

        let record = match lookup {
            Lookup::Found(record) => record,
            Lookup::UnknownWord => {
                info!(channel = %self.channel_id, word, "unknown word");
                return Ok(GameResult::Unknown);
            }
        };

        if let Some(existing) = guesses.iter().find(|g| g.word == word) {
            return Ok(GameResult::Duplicate {
                guess: existing.clone(),
                guesses,
            });
        }

        let appended = self
            .ledger
            .append(&self.channel_id, secret, user, &word, &record)
            .await?;

        let result = if appended.inserted {
            GameResult::classify(appended.guess, appended.guesses)
        } else {
            GameResult::Duplicate {
                guess: appended.guess,
                guesses: appended.guesses,
            }
        };

        info!(
            channel = %self.channel_id,
            user = %user.name,
            word,
            code = result.code(),
            similarity = record.similarity,
            "guess processed"
        );
        Ok(result)
    }
}
