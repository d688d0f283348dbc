use std::sync::Arc;

use super::{GameError, WordList};

/// Length of one puzzle day (UTC, fixed 24h).
pub const DAY_MS: i64 = 86_400_000;

/// Day index of puzzle #0.
pub const EPOCH_DAY: i64 = 19021;

/// Source of wall-clock time, in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// One puzzle day as seen from a single instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleDay {
    pub day_index: i64,
    pub puzzle_number: usize,
    pub secret_word: String,
    pub time_since_start_ms: i64,
    pub time_until_next_ms: i64,
}

/// Maps an instant to the active puzzle. Never stores anything.
#[derive(Clone)]
pub struct PuzzleClock {
    clock: Arc<dyn Clock>,
    words: WordList,
}

impl PuzzleClock {
    pub fn new(clock: Arc<dyn Clock>, words: WordList) -> Self {
        Self { clock, words }
    }

    pub fn today(&self) -> Result<PuzzleDay, GameError> {
        let now = self.clock.now_ms();
        let time_since_start_ms = now.rem_euclid(DAY_MS);
        self.day(
            now.div_euclid(DAY_MS),
            time_since_start_ms,
            DAY_MS - time_since_start_ms,
        )
    }

    /// The immediately-prior puzzle day. Its timings describe that whole day.
    pub fn previous(&self) -> Result<PuzzleDay, GameError> {
        let today = self.clock.now_ms().div_euclid(DAY_MS);
        self.day(today - 1, DAY_MS, 0)
    }

    fn day(
        &self,
        day_index: i64,
        time_since_start_ms: i64,
        time_until_next_ms: i64,
    ) -> Result<PuzzleDay, GameError> {
        let len = self.words.len() as i64;
        if len == 0 {
            return Err(GameError::Configuration(
                "secret word list is empty".to_string(),
            ));
        }
        let puzzle_number = (day_index - EPOCH_DAY).rem_euclid(len) as usize;
        let secret_word = self
            .words
            .get(puzzle_number)
            .ok_or_else(|| {
                GameError::Configuration(format!(
                    "No secret word for puzzle number {}",
                    puzzle_number
                ))
            })?
            .to_lowercase();

        Ok(PuzzleDay {
            day_index,
            puzzle_number,
            secret_word,
            time_since_start_ms,
            time_until_next_ms,
        })
    }
}
