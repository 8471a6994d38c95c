use snip_core::StorageError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("storage error: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}
