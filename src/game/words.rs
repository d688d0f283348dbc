use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use super::GameError;

/// Built-in rotation, one word per line.
const DEFAULT_WORDS: &str = include_str!("../../data/secret_words.txt");

/// Ordered, non-empty list of secret words. Order defines the daily rotation.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Arc<[String]>,
}

impl WordList {
    /// Parse a newline-separated list. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let words: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Self::from_words(words)
    }

    pub fn from_words(words: Vec<String>) -> Result<Self, GameError> {
        if words.is_empty() {
            return Err(GameError::Configuration(
                "secret word list is empty".to_string(),
            ));
        }
        Ok(Self {
            words: words.into(),
        })
    }

    pub fn builtin() -> Result<Self, GameError> {
        Self::parse(DEFAULT_WORDS)
    }

    /// Load from `path` if given, otherwise fall back to the built-in list.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read word list {:?}", path))?;
                Ok(Self::parse(&text)?)
            }
            None => Ok(Self::builtin()?),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }
}
