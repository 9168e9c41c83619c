//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Retry logic with fixed or exponential backoff
//! - Error classification

use crate::config::CrawlerConfig;
use crate::CrawlError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use url::Url;

/// Upper bound for the connect phase of a request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
    /// Attempts used, 1-based
    pub attempts: u32,
}

/// Result of fetching one URL with retries
#[derive(Debug)]
pub enum FetchResult {
    /// Got a 2xx response
    Success(FetchedPage),

    /// Every attempt failed; holds the last error
    Failed {
        /// The error from the final attempt
        error: CrawlError,
        /// Number of attempts made
        attempts: u32,
    },

    /// The crawl was cancelled before the fetch finished
    Cancelled,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use doc_harvest::config::CrawlerConfig;
/// use doc_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let timeout = config.timeout();

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying failed attempts
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Success |
/// | Any other status | Retry |
/// | Timeout | Retry |
/// | Connection or TLS error | Retry |
///
/// At most `config.retries` attempts are made. Between attempts the worker
/// sleeps for `config.backoff_delay(attempt)`. Both the request and the
/// sleep are abandoned as soon as `cancel` fires.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `config` - Retry count and backoff settings
/// * `cancel` - Token that aborts the fetch
pub async fn fetch_with_retry(
    client: &Client,
    url: &Url,
    config: &CrawlerConfig,
    cancel: &CancellationToken,
) -> FetchResult {
    let max_attempts = config.retries.max(1);
    let mut attempt = 1;

    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return FetchResult::Cancelled,
            outcome = fetch_once(client, url) => outcome,
        };

        match outcome {
            Ok(mut page) => {
                page.attempts = attempt;
                debug!(
                    "Fetched {} (HTTP {}, attempt {})",
                    url, page.status_code, attempt
                );
                return FetchResult::Success(page);
            }
            Err(e) if attempt >= max_attempts => {
                error!(
                    "Giving up on {} after {} attempt(s): {}",
                    url, attempt, e
                );
                return FetchResult::Failed {
                    error: e,
                    attempts: attempt,
                };
            }
            Err(e) => {
                let delay = config.backoff_delay(attempt);
                warn!(
                    "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                    attempt, max_attempts, url, e, delay
                );

                tokio::select! {
                    _ = cancel.cancelled() => return FetchResult::Cancelled,
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
        }
    }
}

/// Performs one GET request
async fn fetch_once(client: &Client, url: &Url) -> Result<FetchedPage, CrawlError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
        attempts: 1,
    })
}

fn classify_error(url: &Url, e: reqwest::Error) -> CrawlError {
    if e.is_timeout() {
        CrawlError::Timeout {
            url: url.to_string(),
        }
    } else {
        CrawlError::Reqwest(e)
    }
}
