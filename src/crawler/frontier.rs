//! Crawl frontier shared by the workers
//!
//! The frontier is a FIFO queue of URLs waiting to be fetched. It also
//! tracks how many entries are being processed, so that an empty queue with
//! no work in flight can be recognized as the end of the crawl.

use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use tokio::sync::Notify;
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized URL
    pub url: Url,

    /// Link distance from the seed
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

#[derive(Debug, Default)]
struct Inner {
    queue: VecDeque<FrontierEntry>,
    in_flight: usize,
    closed: bool,
}

/// FIFO work queue with completion tracking
///
/// Every entry returned by [`Frontier::next`] must be handed back through
/// [`Frontier::complete`] once its links have been pushed.
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry; returns false if the frontier was closed
    pub fn push(&self, entry: FrontierEntry) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.closed {
                return false;
            }
            inner.queue.push_back(entry);
        }
        self.notify.notify_waiters();
        true
    }

    /// Waits for the next entry
    ///
    /// Returns `None` once the frontier is closed, or when the queue is empty
    /// and no other worker holds an entry that could still add links.
    pub async fn next(&self) -> Option<FrontierEntry> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut inner = self.inner.lock();
                if inner.closed {
                    return None;
                }
                if let Some(entry) = inner.queue.pop_front() {
                    inner.in_flight += 1;
                    return Some(entry);
                }
                if inner.in_flight == 0 {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Marks one entry returned by `next` as finished
    pub fn complete(&self) {
        {
            let mut inner = self.inner.lock();
            inner.in_flight = inner.in_flight.saturating_sub(1);
        }
        self.notify.notify_waiters();
    }

    /// Drops all queued entries and wakes every waiting worker
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock();
            inner.closed = true;
            inner.queue.clear();
        }
        self.notify.notify_waiters();
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().queue.is_empty()
    }

    /// Number of entries handed out and not yet completed
    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight
    }
}

/// Set of URLs that have been claimed for fetching
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url`; returns false if it was already claimed
    pub fn claim(&self, url: &str) -> bool {
        self.urls.lock().insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.lock().is_empty()
    }
}
