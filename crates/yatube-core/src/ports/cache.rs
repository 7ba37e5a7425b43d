use async_trait::async_trait;
use std::time::Duration;

/// Key/value store for rendered pages.
///
/// Entries written with a TTL disappear once it elapses; `clear` drops
/// everything at once. Readers treat a backend failure on `get` as a miss.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value`, replacing any previous entry. `None` keeps it until cleared.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn exists(&self, key: &str) -> bool;

    /// Drop every entry owned by this cache.
    async fn clear(&self) -> Result<(), CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unreachable: {0}")]
    Connection(String),

    #[error("Cache command failed: {0}")]
    Operation(String),
}
