//! Filesystem article store

use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use std::path::{Path, PathBuf};

/// Returns the last path segment of an article href
///
/// Leading and trailing slashes are ignored, so both
/// `https://host/news/story/` and `https://host/news/story` map to `story`.
/// Returns `None` when no usable segment remains.
pub fn article_file_name(href: &str) -> Option<&str> {
    href.trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

/// Stores each article as a plain text file inside one directory
#[derive(Debug, Clone)]
pub struct FsArticleStore {
    dir: PathBuf,
}

impl FsArticleStore {
    /// Creates a store rooted at `dir`; the directory is not touched
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the article directory if it does not exist yet
    ///
    /// Returns true if the directory had to be created.
    pub fn ensure_dir(&self) -> StorageResult<bool> {
        if self.dir.is_dir() {
            return Ok(false);
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        tracing::info!("Created articles directory: {}", self.dir.display());
        Ok(true)
    }

    /// The directory articles are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the article with the given file name is stored at
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl ArticleStore for FsArticleStore {
    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn write_article(&self, name: &str, body: &str) -> StorageResult<()> {
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let path = self.path_for(name);
        std::fs::write(&path, body).map_err(|e| StorageError::io(&path, e))
    }
}
