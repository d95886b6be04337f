//! Crawler module for the two harvest phases
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through one shared client per phase
//! - HTML extraction of listing entries and article bodies
//! - Batched fan-out with a barrier between batches
//! - The page-index and article-body crawlers

mod articles;
mod batch;
mod extractor;
mod fetcher;
mod pages;

pub use articles::{ArticleCrawler, ArticleOutcome};
pub use batch::BatchRunner;
pub use extractor::{extract_article_body, extract_listing, Document, Node, Selectors};
pub use fetcher::{build_http_client, FetchResponse, HttpClient};
pub use pages::{PageCrawler, PageOutcome};

use crate::config::{Config, MissingFieldPolicy};
use crate::output::{ArticleCrawlStats, PageCrawlStats};
use crate::storage::{load_index, save_index, FsArticleStore};
use crate::{ExtractError, HarvestError};
use std::path::Path;

/// Applies the missing-field policy to an extraction failure
///
/// Returns the error under `Abort`; logs and swallows it under `Skip`.
pub(crate) fn handle_extract_error(
    policy: MissingFieldPolicy,
    url: &str,
    source: ExtractError,
) -> Result<(), HarvestError> {
    match policy {
        MissingFieldPolicy::Abort => Err(HarvestError::Extract {
            url: url.to_string(),
            source,
        }),
        MissingFieldPolicy::Skip => {
            tracing::warn!("Skipping {}: {}", url, source);
            Ok(())
        }
    }
}

/// Runs the `pages` phase
///
/// Crawls the listing and writes the article index. The index is written only
/// once the whole crawl has succeeded.
///
/// # Returns
///
/// * `Ok(PageCrawlStats)` - Index written
/// * `Err(HarvestError)` - Crawl or index write failed; no index was written
pub async fn harvest_pages(config: &Config) -> Result<PageCrawlStats, HarvestError> {
    let mut crawler = PageCrawler::new(config)?;
    let records = crawler.crawl_pages().await?;

    save_index(Path::new(&config.output.index_path), &records)?;

    Ok(crawler.stats().clone())
}

/// Runs the `articles` phase
///
/// Ensures the articles directory exists, loads the index written by
/// [`harvest_pages`] and stores every article it lists.
///
/// # Returns
///
/// * `Ok(ArticleCrawlStats)` - Every record was handled
/// * `Err(HarvestError)` - The phase stopped early; files written so far remain
pub async fn harvest_articles(config: &Config) -> Result<ArticleCrawlStats, HarvestError> {
    FsArticleStore::new(&config.output.articles_dir).ensure_dir()?;

    let records = load_index(Path::new(&config.output.index_path))?;

    let mut crawler = ArticleCrawler::new(config)?;
    crawler.crawl_articles(&records).await?;

    Ok(crawler.stats().clone())
}
