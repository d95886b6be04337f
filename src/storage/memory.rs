//! In-memory article store for unit tests

use crate::storage::traits::{ArticleStore, StorageResult};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Keeps article bodies in a map keyed by file name
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: Mutex<BTreeMap<String, String>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store, as if an earlier run had written these files
    pub fn with_articles<I, K, V>(articles: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = articles
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            articles: Mutex::new(map),
        }
    }

    /// Body stored under `name`, if any
    pub fn get(&self, name: &str) -> Option<String> {
        self.articles.lock().unwrap().get(name).cloned()
    }

    /// Number of stored articles
    pub fn len(&self) -> usize {
        self.articles.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArticleStore for MemoryArticleStore {
    fn exists(&self, name: &str) -> bool {
        self.articles.lock().unwrap().contains_key(name)
    }

    fn write_article(&self, name: &str, body: &str) -> StorageResult<()> {
        self.articles
            .lock()
            .unwrap()
            .insert(name.to_string(), body.to_string());
        Ok(())
    }
}
