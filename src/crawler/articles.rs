//! Article-body crawler
//!
//! Reads article records in fixed-size windows, fetches every article of a
//! window concurrently and stores the text of its main container. A fixed
//! politeness pause follows every window.

use crate::config::{Config, MissingFieldPolicy};
use crate::crawler::batch::BatchRunner;
use crate::crawler::extractor::{extract_article_body, Selectors};
use crate::crawler::fetcher::HttpClient;
use crate::crawler::handle_extract_error;
use crate::output::ArticleCrawlStats;
use crate::storage::{ArticleRecord, ArticleStore, FsArticleStore};
use crate::{ConfigError, HarvestError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// What processing one article record produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOutcome {
    /// The body was fetched and stored
    Written,

    /// The basename carries the reserved prefix; nothing was fetched
    SkippedMarker,

    /// The output file already existed; nothing was fetched
    SkippedExisting,

    /// The href has no usable last segment; nothing was fetched
    SkippedUnnamed,

    /// The server answered with a non-2xx status; nothing was stored
    NonSuccess(u16),

    /// The page lacked the content container and the skip policy is active
    Malformed,
}

/// Downloads and stores article bodies
pub struct ArticleCrawler {
    client: HttpClient,
    selectors: Selectors,
    store: Arc<dyn ArticleStore>,
    runner: BatchRunner,
    skip_prefix: String,
    skip_existing: bool,
    policy: MissingFieldPolicy,
    stats: ArticleCrawlStats,
}

impl ArticleCrawler {
    /// Creates a crawler with its own HTTP client, writing into the
    /// configured articles directory
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = HttpClient::from_config(&config.crawler, &config.user_agent)?;
        let store = Arc::new(FsArticleStore::new(&config.output.articles_dir));
        Self::with_parts(config, client, store)
    }

    /// Creates a crawler from an explicit client and article store
    pub fn with_parts(
        config: &Config,
        client: HttpClient,
        store: Arc<dyn ArticleStore>,
    ) -> Result<Self, HarvestError> {
        let selectors = Selectors::from_config(&config.extractor)
            .map_err(|e| ConfigError::InvalidSelector(e.to_string()))?;

        let runner = BatchRunner::new(config.crawler.article_batch_size as usize)
            .with_pause(Duration::from_millis(config.crawler.politeness_delay_ms));

        Ok(Self {
            client,
            selectors,
            store,
            runner,
            skip_prefix: config.crawler.skip_prefix.clone(),
            skip_existing: config.crawler.skip_existing,
            policy: config.crawler.missing_field,
            stats: ArticleCrawlStats::default(),
        })
    }

    /// Statistics of the most recent crawl
    pub fn stats(&self) -> &ArticleCrawlStats {
        &self.stats
    }

    /// Returns true if the record points at an alternate rendering that must
    /// never be fetched
    pub fn is_reserved(&self, record: &ArticleRecord) -> bool {
        record
            .file_name()
            .is_some_and(|name| name.starts_with(&self.skip_prefix))
    }

    /// Fetches and stores every article in `records`
    ///
    /// Records are processed in windows of the configured batch size, each
    /// window followed by the politeness pause. Files are written as soon as
    /// their article arrives, so an aborted crawl keeps what it stored.
    ///
    /// # Errors
    ///
    /// * `HarvestError::Network` - an article could not be fetched at all
    /// * `HarvestError::Storage` - an article file could not be written
    /// * `HarvestError::Extract` - an article lacked its content container and
    ///   the missing-field policy is `abort`
    pub async fn crawl_articles(&mut self, records: &[ArticleRecord]) -> Result<(), HarvestError> {
        let mut stats = ArticleCrawlStats {
            started_at: Some(Utc::now()),
            ..ArticleCrawlStats::default()
        };
        let mut handled = 0usize;

        tracing::info!(
            "Fetching {} articles in windows of {}",
            records.len(),
            self.runner.batch_size()
        );

        let this = &*self;
        let result = this
            .runner
            .run(
                records,
                |record| this.fetch_article(record),
                |_, outcomes| -> Result<(), HarvestError> {
                    stats.windows += 1;
                    handled += outcomes.len();
                    for outcome in outcomes {
                        match outcome? {
                            ArticleOutcome::Written => {
                                stats.fetched += 1;
                                stats.written += 1;
                            }
                            ArticleOutcome::NonSuccess(_) => {
                                stats.fetched += 1;
                                stats.non_success += 1;
                            }
                            ArticleOutcome::Malformed => {
                                stats.fetched += 1;
                                stats.malformed += 1;
                            }
                            ArticleOutcome::SkippedMarker => stats.skipped_marker += 1,
                            ArticleOutcome::SkippedExisting => stats.skipped_existing += 1,
                            ArticleOutcome::SkippedUnnamed => stats.skipped_unnamed += 1,
                        }
                    }
                    tracing::debug!("Handled {} articles", handled);
                    Ok(())
                },
            )
            .await;

        stats.finished_at = Some(Utc::now());
        self.stats = stats;
        result?;

        tracing::info!(
            "Stored {} of {} articles",
            self.stats.written,
            records.len()
        );
        Ok(())
    }

    /// Fetches one article and stores its body
    ///
    /// Reserved, unnamed and (with `skip_existing`) already stored records
    /// return without touching the network.
    pub async fn fetch_article(&self, record: &ArticleRecord) -> Result<ArticleOutcome, HarvestError> {
        if self.is_reserved(record) {
            tracing::debug!("Skipping alternate rendering: {}", record.href);
            return Ok(ArticleOutcome::SkippedMarker);
        }

        let Some(name) = record.file_name() else {
            tracing::warn!("No file name in article URL {:?}, skipping", record.href);
            return Ok(ArticleOutcome::SkippedUnnamed);
        };

        if self.skip_existing && self.store.exists(name) {
            tracing::debug!("Already stored, skipping: {}", name);
            return Ok(ArticleOutcome::SkippedExisting);
        }

        tracing::debug!("Handling article: {}", record.href);
        let response = self.client.get(&record.href).await?;
        if !response.is_success() {
            tracing::debug!(
                "Could not handle article {}: HTTP {}",
                record.href,
                response.status
            );
            return Ok(ArticleOutcome::NonSuccess(response.status));
        }

        let body = match extract_article_body(&response.body, &self.selectors) {
            Ok(body) => body,
            Err(source) => {
                handle_extract_error(self.policy, &record.href, source)?;
                return Ok(ArticleOutcome::Malformed);
            }
        };

        self.write_article(name, &body)?;
        Ok(ArticleOutcome::Written)
    }

    /// Stores one article body under `name`
    pub fn write_article(&self, name: &str, body: &str) -> Result<(), HarvestError> {
        self.store.write_article(name, body)?;
        Ok(())
    }
}
