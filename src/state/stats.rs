use super::EntryState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Summary of one crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Pages that produced a PageResult
    pub processed: usize,

    /// URLs whose fetch attempts were all exhausted
    pub failed: usize,

    /// Entries dropped at dequeue because the URL was already claimed
    pub skipped: usize,

    /// Links dropped by include/exclude patterns
    pub filtered: usize,

    /// Links that were invalid or pointed at another host
    pub rejected: usize,

    /// Links not enqueued because of the depth limit or follow-links
    pub depth_limited: usize,

    /// Entries ever pushed to the frontier, seed included
    pub total_discovered: usize,

    pub cancelled: bool,

    pub started_at: DateTime<Utc>,

    pub finished_at: DateTime<Utc>,
}

impl CrawlStats {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Live counters shared by the crawl workers
#[derive(Debug, Default)]
pub struct CrawlCounters {
    processed: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
    filtered: AtomicUsize,
    rejected: AtomicUsize,
    depth_limited: AtomicUsize,
    discovered: AtomicUsize,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an entry that reached a terminal state
    ///
    /// Returns the new total for that state, or 0 for active states.
    pub fn record(&self, state: EntryState) -> usize {
        let counter = match state {
            EntryState::Succeeded => &self.processed,
            EntryState::Failed => &self.failed,
            EntryState::Skipped => &self.skipped,
            EntryState::Queued | EntryState::Fetching => return 0,
        };
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add_filtered(&self, n: usize) {
        self.filtered.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_rejected(&self, n: usize) {
        self.rejected.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_depth_limited(&self, n: usize) {
        self.depth_limited.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_discovered(&self, n: usize) {
        self.discovered.fetch_add(n, Ordering::Relaxed);
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a `CrawlStats`
    pub fn snapshot(
        &self,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cancelled: bool,
    ) -> CrawlStats {
        CrawlStats {
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            depth_limited: self.depth_limited.load(Ordering::Relaxed),
            total_discovered: self.discovered.load(Ordering::Relaxed),
            cancelled,
            started_at,
            finished_at,
        }
    }
}
