use crate::game::provider::ProviderError;
use crate::kv::StoreError;

/// Everything a game operation can fail with. Unknown words are not errors.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
