pub mod disk;
pub mod memory;

use async_trait::async_trait;

pub use disk::CnidariumStore;
pub use memory::MemoryStore;

// Key namespaces, no trailing slashes (cnidarium convention)
pub const SIMILARITY_PREFIX: &str = "similarity";
pub const GUESSES_PREFIX: &str = "guesses";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("corrupt record at {key}: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("too many concurrent writes to {0}, try again")]
    Conflict(String),
}

/// String-keyed byte store shared by every game session.
///
/// No cross-key transactions. `compare_and_swap` is the only ordering
/// primitive: it writes `value` only if the current value equals `expected`
/// (`None` meaning "absent") and reports whether it did.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        value: Vec<u8>,
    ) -> Result<bool, StoreError>;
}

/// Escape a key segment so user-supplied text can't forge a `/` boundary.
fn escape_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace('/', "%2F")
}

pub fn similarity_key(secret: &str, word: &str) -> String {
    format!(
        "{}/{}/{}",
        SIMILARITY_PREFIX,
        escape_segment(secret),
        escape_segment(word)
    )
}

pub fn guesses_key(channel_id: &str, secret: &str) -> String {
    format!(
        "{}/{}/{}",
        GUESSES_PREFIX,
        escape_segment(channel_id),
        escape_segment(secret)
    )
}
