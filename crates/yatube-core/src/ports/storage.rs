//! Media storage port - where uploaded post images live.

use async_trait::async_trait;

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `content` under `directory/filename`, returning the relative path
    /// actually used. Existing files are never overwritten; a free name is
    /// chosen instead.
    async fn save(
        &self,
        directory: &str,
        filename: &str,
        content: &[u8],
    ) -> Result<String, StorageError>;

    /// Read a stored file by its relative path.
    async fn open(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove a stored file.
    async fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// Public URL of a stored file.
    fn url(&self, path: &str) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
