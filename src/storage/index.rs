//! JSON article index
//!
//! The index is the only artifact shared by the two phases: a pretty-printed
//! JSON array of article records in discovery order.

use crate::storage::traits::{StorageError, StorageResult};
use crate::storage::ArticleRecord;
use std::path::Path;

/// Writes the article index, replacing any existing file
///
/// Missing parent directories are created.
pub fn save_index(path: &Path, records: &[ArticleRecord]) -> StorageResult<()> {
    let json = serde_json::to_string_pretty(records).map_err(|source| StorageError::Json {
        path: path.display().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    std::fs::write(path, json).map_err(|e| StorageError::io(path, e))?;
    tracing::info!("Saved {} records to {}", records.len(), path.display());

    Ok(())
}

/// Reads an article index written by [`save_index`]
pub fn load_index(path: &Path) -> StorageResult<Vec<ArticleRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;

    let records: Vec<ArticleRecord> =
        serde_json::from_str(&content).map_err(|source| StorageError::Json {
            path: path.display().to_string(),
            source,
        })?;

    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
