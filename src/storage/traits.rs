//! Storage traits and error types
//!
//! This module defines the trait interface for article stores and
//! associated error types.

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Index format error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid article file name: {0:?}")]
    InvalidName(String),
}

impl StorageError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for harvested article bodies
///
/// Calls arrive concurrently from every task of an article window, so
/// implementations take `&self` and handle their own synchronization.
pub trait ArticleStore: Send + Sync {
    /// Returns true if an article with this file name is already stored
    fn exists(&self, name: &str) -> bool;

    /// Stores an article body under the given file name, replacing any
    /// previous content
    fn write_article(&self, name: &str, body: &str) -> StorageResult<()>;
}
