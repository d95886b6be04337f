//! Page-index crawler
//!
//! Walks listing pages `1..=max_pages` in fixed-size batches and collects the
//! article records found on them, in page order.

use crate::config::{Config, MissingFieldPolicy};
use crate::crawler::batch::BatchRunner;
use crate::crawler::extractor::{extract_listing, Selectors};
use crate::crawler::fetcher::HttpClient;
use crate::crawler::handle_extract_error;
use crate::output::PageCrawlStats;
use crate::storage::ArticleRecord;
use crate::{ConfigError, HarvestError};
use chrono::Utc;
use std::ops::RangeInclusive;

/// What fetching one listing page produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Records found on the page, in document order
    Records(Vec<ArticleRecord>),

    /// The server answered with a non-2xx status; the page contributes nothing
    NonSuccess(u16),

    /// The page lacked an expected element and the skip policy is active
    Malformed,
}

/// Crawls the paginated article listing
pub struct PageCrawler {
    client: HttpClient,
    selectors: Selectors,
    base_url: String,
    max_pages: u32,
    runner: BatchRunner,
    policy: MissingFieldPolicy,
    stats: PageCrawlStats,
}

impl PageCrawler {
    /// Creates a crawler with its own HTTP client
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = HttpClient::from_config(&config.crawler, &config.user_agent)?;
        Self::with_client(config, client)
    }

    /// Creates a crawler that issues requests through `client`
    pub fn with_client(config: &Config, client: HttpClient) -> Result<Self, HarvestError> {
        let selectors = Selectors::from_config(&config.extractor)
            .map_err(|e| ConfigError::InvalidSelector(e.to_string()))?;

        Ok(Self {
            client,
            selectors,
            base_url: config.crawler.base_url.clone(),
            max_pages: config.crawler.max_pages,
            runner: BatchRunner::new(config.crawler.page_batch_size as usize),
            policy: config.crawler.missing_field,
            stats: PageCrawlStats::default(),
        })
    }

    /// URL of listing page `page`: the base URL with the number appended
    pub fn page_url(&self, page: u32) -> String {
        format!("{}{}", self.base_url, page)
    }

    /// Page-number ranges of the batches a crawl will run
    pub fn plan(&self) -> Vec<RangeInclusive<u32>> {
        self.runner
            .plan(self.max_pages as usize)
            .into_iter()
            .map(|range| (range.start as u32 + 1)..=(range.end as u32))
            .collect()
    }

    /// Statistics of the most recent crawl
    pub fn stats(&self) -> &PageCrawlStats {
        &self.stats
    }

    /// Fetches every listing page and returns the records in page order
    ///
    /// Batches run one after another; pages inside a batch are fetched
    /// concurrently. Pages answering with a non-2xx status contribute no
    /// records.
    ///
    /// # Errors
    ///
    /// * `HarvestError::Network` - a page could not be fetched at all
    /// * `HarvestError::Extract` - a page lacked an expected element and the
    ///   missing-field policy is `abort`
    ///
    /// Either error stops the crawl once the current batch has settled, and
    /// no records are returned.
    pub async fn crawl_pages(&mut self) -> Result<Vec<ArticleRecord>, HarvestError> {
        let pages: Vec<u32> = (1..=self.max_pages).collect();
        let mut records = Vec::new();
        let mut stats = PageCrawlStats {
            started_at: Some(Utc::now()),
            ..PageCrawlStats::default()
        };

        tracing::info!(
            "Crawling {} listing pages from {} in batches of {}",
            self.max_pages,
            self.base_url,
            self.runner.batch_size()
        );

        let this = &*self;
        let result = this
            .runner
            .run(
                &pages,
                |page| this.fetch_page(*page),
                |index, outcomes| -> Result<(), HarvestError> {
                    stats.batches += 1;
                    for outcome in outcomes {
                        stats.pages_fetched += 1;
                        match outcome? {
                            PageOutcome::Records(found) => {
                                stats.records_found += found.len() as u64;
                                records.extend(found);
                            }
                            PageOutcome::NonSuccess(_) => stats.pages_non_success += 1,
                            PageOutcome::Malformed => stats.pages_malformed += 1,
                        }
                    }
                    tracing::debug!(
                        "Batch {} done: {} records so far",
                        index + 1,
                        records.len()
                    );
                    Ok(())
                },
            )
            .await;

        stats.finished_at = Some(Utc::now());
        self.stats = stats;
        result?;

        tracing::info!(
            "Collected {} records from {} pages",
            records.len(),
            self.stats.pages_fetched
        );
        Ok(records)
    }

    /// Fetches one listing page and extracts its records
    pub async fn fetch_page(&self, page: u32) -> Result<PageOutcome, HarvestError> {
        let url = self.page_url(page);
        tracing::debug!("Handling page: {}", url);

        let response = self.client.get(&url).await?;
        if !response.is_success() {
            tracing::debug!("Could not handle page {}: HTTP {}", url, response.status);
            return Ok(PageOutcome::NonSuccess(response.status));
        }

        match extract_listing(&response.body, &url, &self.selectors) {
            Ok(records) => Ok(PageOutcome::Records(records)),
            Err(source) => {
                handle_extract_error(self.policy, &url, source)?;
                Ok(PageOutcome::Malformed)
            }
        }
    }
}
