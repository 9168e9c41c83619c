//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `EntryState`: the state machine each frontier entry moves through
//! - `CrawlCounters`: lock-free counters shared by the workers
//! - `CrawlStats`: the frozen summary returned with a crawl result

mod entry_state;
mod stats;

// Re-export main types
pub use entry_state::EntryState;
pub use stats::{CrawlCounters, CrawlStats};
