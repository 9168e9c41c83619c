//! Crawler module for fetching and processing documentation pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - The shared frontier and visited set
//! - Page parsing, extraction, and link classification
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod page;

pub use coordinator::Crawler;
pub use fetcher::{build_http_client, fetch_with_retry, FetchResult, FetchedPage};
pub use frontier::{Frontier, FrontierEntry, VisitedSet};
pub use page::{build_page, PageContext, ParsedPage};

use crate::config::Config;
use crate::output::CrawlResult;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build a profile registry from the built-in and configured profiles
/// 2. Validate the configuration and build the HTTP client
/// 3. Crawl from the seed until no work is left
/// 4. Return every extracted page with the crawl statistics
///
/// # Arguments
///
/// * `seed` - The URL to start from
/// * `config` - The full configuration
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Crawl completed
/// * `Err(CrawlError)` - Invalid configuration or seed
pub async fn crawl(seed: &str, config: &Config) -> Result<CrawlResult, CrawlError> {
    Crawler::from_config(config)?.crawl(seed).await
}
