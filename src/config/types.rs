use serde::Deserialize;

/// Main configuration structure for the harvester
///
/// Every section and key is optional; missing values fall back to the
/// defaults of the archive the harvester was first written for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    pub extractor: ExtractorConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Listing URL prefix; the page number is appended verbatim
    pub base_url: String,

    /// Highest listing page number to fetch (pages are numbered from 1)
    pub max_pages: u32,

    /// Number of listing pages fetched concurrently per batch
    pub page_batch_size: u32,

    /// Number of articles fetched concurrently per window
    pub article_batch_size: u32,

    /// Pause after every article window (milliseconds)
    pub politeness_delay_ms: u64,

    /// Article basenames starting with this marker are alternate renderings
    /// (PDF issues) and are never fetched
    pub skip_prefix: String,

    /// What to do when a page is missing an expected element
    pub missing_field: MissingFieldPolicy,

    /// Skip articles whose output file already exists
    pub skip_existing: bool,

    /// Per-request timeout in seconds; `None` keeps the transport default
    pub request_timeout_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://vn.mk.ua/ru/arhiv/page/".to_string(),
            max_pages: 1528,
            page_batch_size: 5,
            article_batch_size: 5,
            politeness_delay_ms: 1000,
            skip_prefix: "nomer-ot".to_string(),
            missing_field: MissingFieldPolicy::Abort,
            skip_existing: false,
            request_timeout_secs: None,
        }
    }
}

/// Handling of pages that lack an element the extractor expects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingFieldPolicy {
    /// Propagate the error and stop the whole phase
    #[default]
    Abort,

    /// Log the page, count it and carry on with its siblings
    Skip,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ArchiveHarvester".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the JSON article index written by the `pages` phase
    pub index_path: String,

    /// Directory receiving one text file per article
    pub articles_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_path: "./pages.json".to_string(),
            articles_dir: "./articles".to_string(),
        }
    }
}

/// CSS selectors describing the archive markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractorConfig {
    /// `id` attribute of the main content container
    pub container_id: String,

    /// One element per article summary inside the container
    pub article: String,

    /// Heading holding the article link (href + title attributes)
    pub heading: String,

    /// Element wrapping the date link
    pub date: String,

    /// Element holding the category caption
    pub category: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            container_id: "main-content".to_string(),
            article: "article".to_string(),
            heading: "h3".to_string(),
            date: "span.entry-meta-date".to_string(),
            category: "div.mh-image-caption".to_string(),
        }
    }
}
