use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Percentile reported for an exact match with the secret.
pub const FOUND_PERCENTILE: u16 = 1000;

/// Similarity between one secret and one guess. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    pub similarity: f64,
    /// Closeness rank in `0..=1000`; absent when the word is far from the secret.
    #[serde(default)]
    pub percentile: Option<u16>,
    /// Provider payload as received.
    #[serde(default)]
    pub raw: serde_json::Value,
}

/// Outcome of a similarity lookup. Also the on-disk cache format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup {
    Found(SimilarityRecord),
    UnknownWord,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Semantle error: {status} {body}")]
    Status { status: u16, body: String },
    #[error("Semantle error: {0}")]
    Api(String),
    #[error("malformed Semantle response: {0}")]
    Malformed(String),
    #[error("Semantle request failed: {0}")]
    Transport(String),
}

/// Scores a candidate word against a secret.
#[async_trait]
pub trait SimilarityProvider: Send + Sync {
    async fn similarity(&self, secret: &str, word: &str) -> Result<Lookup, ProviderError>;
}
