//! Storage module for persisting harvest data
//!
//! This module handles everything the two phases write to disk:
//! - The JSON article index bridging the `pages` and `articles` phases
//! - One text file per harvested article

mod files;
mod index;
#[cfg(test)]
mod memory;
mod traits;

pub use files::{article_file_name, FsArticleStore};
pub use index::{load_index, save_index};
#[cfg(test)]
pub(crate) use memory::MemoryArticleStore;
pub use traits::{ArticleStore, StorageError, StorageResult};

use serde::{Deserialize, Serialize};

/// Metadata for one article discovered on a listing page
///
/// Field names double as the keys of the persisted JSON index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Listing page the article was found on
    pub page_url: String,

    /// Absolute article URL
    pub href: String,

    /// Title attribute of the heading link
    pub title: String,

    /// Publication date as displayed on the listing
    pub date: String,

    /// Category caption as displayed on the listing
    pub category: String,
}

impl ArticleRecord {
    /// Name of the file this article is stored under, if the href has one
    pub fn file_name(&self) -> Option<&str> {
        article_file_name(&self.href)
    }
}
