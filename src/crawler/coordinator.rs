//! Crawl coordinator - orchestrates the crawl workers
//!
//! This module is responsible for:
//! - Validating configuration and building the HTTP client
//! - Seeding the frontier
//! - Running a pool of workers that fetch, extract, and enqueue links
//! - Enforcing the depth limit, rate limit, and per-worker delay
//! - Collecting page results and statistics
//! - Stopping promptly on cancellation

use super::fetcher::{build_http_client, fetch_with_retry, FetchResult};
use super::frontier::{Frontier, FrontierEntry, VisitedSet};
use super::page::{build_page, PageContext};
use crate::config::{
    validate, validate_crawler_config, validate_rag_config, Config, CrawlerConfig, RagConfig,
};
use crate::output::{CrawlResult, PageResult};
use crate::profile::ProfileRegistry;
use crate::state::{CrawlCounters, EntryState};
use crate::url::{parse_seed, LinkFilters};
use crate::{ConfigError, CrawlError};
use chrono::Utc;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use parking_lot::Mutex;
use reqwest::Client;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use url::Url;

/// A configured crawler
///
/// A `Crawler` holds everything that stays fixed across crawls: validated
/// settings, compiled link filters, the profile registry, and the HTTP
/// client. Each call to [`Crawler::crawl`] starts from an empty frontier.
#[derive(Debug, Clone)]
pub struct Crawler {
    config: Arc<CrawlerConfig>,
    rag: Arc<RagConfig>,
    registry: Arc<ProfileRegistry>,
    filters: Arc<LinkFilters>,
    client: Client,
}

impl Crawler {
    /// Creates a crawler from validated settings
    ///
    /// # Arguments
    ///
    /// * `config` - Crawler behavior settings
    /// * `rag` - Chunking settings
    /// * `registry` - Site profiles used for detection and extraction
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(ConfigError)` - Invalid settings, a bad pattern, or a client
    ///   that could not be built
    pub fn new(
        config: CrawlerConfig,
        rag: RagConfig,
        registry: Arc<ProfileRegistry>,
    ) -> Result<Self, ConfigError> {
        validate_crawler_config(&config)?;
        validate_rag_config(&rag)?;

        let filters = LinkFilters::from_config(&config)?;
        let client = build_http_client(&config)?;

        Ok(Self {
            config: Arc::new(config),
            rag: Arc::new(rag),
            registry,
            filters: Arc::new(filters),
            client,
        })
    }

    /// Creates a crawler with the user profiles of `config` ahead of the built-ins
    ///
    /// The whole configuration is validated first, output section included.
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        validate(config)?;
        let registry = ProfileRegistry::from_config(&config.profiles)?;
        Ok(Self::new(
            config.crawler.clone(),
            config.rag.clone(),
            Arc::new(registry),
        )?)
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Crawls from `seed` until no work is left
    pub async fn crawl(&self, seed: &str) -> Result<CrawlResult, CrawlError> {
        self.crawl_with_cancellation(seed, CancellationToken::new())
            .await
    }

    /// Crawls from `seed` until no work is left or `cancel` fires
    ///
    /// On cancellation the pages finished so far are returned and
    /// `stats.cancelled` is set. Work in flight at that moment is dropped.
    pub async fn crawl_with_cancellation(
        &self,
        seed: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlResult, CrawlError> {
        let seed_url = parse_seed(seed).map_err(|e| CrawlError::InvalidSeed {
            url: seed.to_string(),
            reason: e.to_string(),
        })?;

        let started_at = Utc::now();
        info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            seed_url, self.config.max_depth, self.config.concurrency
        );

        let run = Arc::new(CrawlRun::new(self, cancel));
        run.enqueue(seed_url, 0);

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.concurrency {
            let run = run.clone();
            workers.spawn(async move { run.work(worker_id).await });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!("Crawl worker failed: {}", e);
                run.cancel.cancel();
                return Err(CrawlError::Worker(e));
            }
        }

        let pages = std::mem::take(&mut *run.results.lock());
        let stats = run
            .counters
            .snapshot(started_at, Utc::now(), run.cancel.is_cancelled());

        info!(
            "Crawl finished: {} processed, {} failed, {} skipped in {:.2}s{}",
            stats.processed,
            stats.failed,
            stats.skipped,
            run.started.elapsed().as_secs_f64(),
            if stats.cancelled { " (cancelled)" } else { "" }
        );

        Ok(CrawlResult { pages, stats })
    }

    /// Runs [`Crawler::crawl`] on a fresh multi-threaded runtime
    ///
    /// Must not be called from inside an async context.
    pub fn crawl_blocking(&self, seed: &str) -> Result<CrawlResult, CrawlError> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(self.crawl(seed))
    }
}

/// State shared by the workers of one crawl
struct CrawlRun {
    config: Arc<CrawlerConfig>,
    rag: Arc<RagConfig>,
    registry: Arc<ProfileRegistry>,
    filters: Arc<LinkFilters>,
    client: Client,
    frontier: Frontier,
    visited: VisitedSet,
    results: Mutex<BTreeMap<String, PageResult>>,
    counters: CrawlCounters,
    limiter: Option<DefaultDirectRateLimiter>,
    cancel: CancellationToken,
    started: Instant,
}

impl CrawlRun {
    fn new(crawler: &Crawler, cancel: CancellationToken) -> Self {
        let limiter = NonZeroU32::new(crawler.config.rate_limit)
            .map(|rate| RateLimiter::direct(Quota::per_second(rate)));

        Self {
            config: crawler.config.clone(),
            rag: crawler.rag.clone(),
            registry: crawler.registry.clone(),
            filters: crawler.filters.clone(),
            client: crawler.client.clone(),
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            results: Mutex::new(BTreeMap::new()),
            counters: CrawlCounters::new(),
            limiter,
            cancel,
            started: Instant::now(),
        }
    }

    async fn work(&self, worker_id: u32) {
        loop {
            let entry = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.frontier.close();
                    break;
                }
                entry = self.frontier.next() => match entry {
                    Some(entry) => entry,
                    None => break,
                },
            };

            self.process(entry).await;
            self.frontier.complete();
        }

        debug!("Worker {} finished", worker_id);
    }

    /// Takes one frontier entry through its states
    async fn process(&self, entry: FrontierEntry) {
        let state = EntryState::Queued;

        if !self.visited.claim(entry.url.as_str()) {
            debug!("Skipping {}: already visited", entry.url);
            self.settle(state, EntryState::Skipped);
            return;
        }

        let Some(state) = self.advance(state, EntryState::Fetching) else {
            return;
        };

        if let Some(limiter) = &self.limiter {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = limiter.until_ready() => {}
            }
        }

        let fetched = match fetch_with_retry(&self.client, &entry.url, &self.config, &self.cancel)
            .await
        {
            FetchResult::Success(page) => page,
            FetchResult::Failed { .. } => {
                self.settle(state, EntryState::Failed);
                self.pause().await;
                return;
            }
            FetchResult::Cancelled => return,
        };

        let parsed = build_page(
            &fetched.body,
            &entry.url,
            &fetched.final_url,
            entry.depth,
            PageContext {
                registry: &self.registry,
                rag: &self.rag,
                filters: &self.filters,
            },
        );

        if self.cancel.is_cancelled() {
            return;
        }

        self.counters.add_filtered(parsed.filtered);
        self.counters.add_rejected(parsed.rejected);
        self.enqueue_links(&entry, parsed.follow);

        debug!(
            "Extracted {} with profile {} ({} links)",
            entry.url,
            parsed.result.profile,
            parsed.result.links.len()
        );
        self.results
            .lock()
            .insert(parsed.result.url.clone(), parsed.result);

        let processed = self.settle(state, EntryState::Succeeded);
        if processed > 0 && processed % 10 == 0 {
            let elapsed = self.started.elapsed().as_secs_f64();
            info!(
                "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                processed,
                self.frontier.len(),
                processed as f64 / elapsed.max(f64::EPSILON)
            );
        }

        self.pause().await;
    }

    fn enqueue(&self, url: Url, depth: u32) {
        if self.frontier.push(FrontierEntry::new(url, depth)) {
            self.counters.add_discovered(1);
        }
    }

    fn enqueue_links(&self, entry: &FrontierEntry, links: Vec<Url>) {
        if links.is_empty() {
            return;
        }

        if !self.config.follow_links || entry.depth >= self.config.max_depth {
            debug!(
                "Not following {} links from {}: depth limit reached",
                links.len(),
                entry.url
            );
            self.counters.add_depth_limited(links.len());
            return;
        }

        for link in links {
            self.enqueue(link, entry.depth + 1);
        }
    }

    fn advance(&self, from: EntryState, to: EntryState) -> Option<EntryState> {
        match from.transition(to) {
            Ok(state) => Some(state),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Moves an entry into a terminal state and counts it
    fn settle(&self, from: EntryState, to: EntryState) -> usize {
        self.advance(from, to)
            .map(|state| self.counters.record(state))
            .unwrap_or(0)
    }

    /// Per-worker politeness delay
    async fn pause(&self) {
        let delay = self.config.delay();
        if delay.is_zero() {
            return;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
