//! Output module for crawl results
//!
//! This module handles:
//! - The result model handed to exporters (`PageResult`, `CrawlResult`)
//! - Writing a result to disk through a `ResultWriter`
//! - Printing crawl statistics

mod json;
pub mod stats;
mod traits;

pub use json::JsonWriter;
pub use stats::{format_statistics, print_statistics, StatisticsReport};
pub use traits::{OutputError, OutputResult, ResultWriter};

use crate::rag::RagContent;
use crate::state::CrawlStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything extracted from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Normalized URL of the page
    pub url: String,

    /// Text of the `<title>` tag, empty if missing
    pub title: String,

    /// Serialized main content subtree
    pub content_html: String,

    /// Serialized navigation subtree, empty if none was found
    pub navigation_html: String,

    /// Name of the profile used for extraction
    pub profile: String,

    /// Link distance from the seed
    pub depth: u32,

    /// Same-domain links on the page, in document order, first occurrence only
    pub links: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_content: Option<RagContent>,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Outcome of one crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Page results keyed by normalized URL
    pub pages: BTreeMap<String, PageResult>,

    pub stats: CrawlStats,
}

impl CrawlResult {
    pub fn get(&self, url: &str) -> Option<&PageResult> {
        self.pages.get(url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages extracted with each profile
    pub fn profile_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for page in self.pages.values() {
            *counts.entry(page.profile.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Total RAG chunks across all pages
    pub fn chunk_count(&self) -> usize {
        self.pages
            .values()
            .filter_map(|page| page.rag_content.as_ref())
            .map(RagContent::len)
            .sum()
    }
}
