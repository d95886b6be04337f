//! HTTP fetcher implementation
//!
//! One [`HttpClient`] is built per crawl phase and shared by every concurrent
//! request of that phase. Fetching never retries. Any status code is a normal
//! response; only transport failures are errors.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::HarvestError;
use reqwest::Client;
use std::time::Duration;

/// Response to a GET request
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// URL that was requested
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Response body decoded as text, empty for non-2xx statuses
    pub body: String,
}

impl FetchResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Shared HTTP connection context for one crawl phase
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Wraps an already configured reqwest client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the harvester configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, HarvestError> {
        Ok(Self::new(build_http_client(crawler, user_agent)?))
    }

    /// Issues a GET request and reads the whole body of a 2xx response
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResponse)` - The server answered, with any status code
    /// * `Err(HarvestError::Network)` - Connection, DNS, TLS or body read failure
    pub async fn get(&self, url: &str) -> Result<FetchResponse, HarvestError> {
        let network = |source| HarvestError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        // Non-2xx responses carry no data the harvester uses
        let body = if status.is_success() {
            response.text().await.map_err(network)?
        } else {
            String::new()
        };

        Ok(FetchResponse {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

/// Builds an HTTP client with the harvester user agent
///
/// No timeout is set unless `request_timeout_secs` is configured, so a
/// request that never resolves stalls its batch.
///
/// # Example
///
/// ```no_run
/// use archive_harvester::config::{CrawlerConfig, UserAgentConfig};
/// use archive_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let agent = format!("{}/{}", user_agent.crawler_name, user_agent.crawler_version);

    let mut builder = Client::builder().user_agent(agent).gzip(true).brotli(true);

    if let Some(secs) = crawler.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}
