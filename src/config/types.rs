use serde::Deserialize;
use std::time::Duration;

/// Output formats understood by the downstream exporters
pub const OUTPUT_FORMATS: &[&str] = &["markdown", "json", "csv", "html", "zip", "claude"];

/// Main configuration structure for Doc-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub profiles: Vec<ProfileEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum link depth from the seed (seed is depth 0)
    pub max_depth: u32,

    /// Minimum spacing between requests of one worker (milliseconds)
    pub delay_ms: u64,

    /// Per-request deadline (seconds)
    pub timeout_secs: u64,

    /// Total fetch attempts before a URL counts as failed
    pub retries: u32,

    /// Wait strategy between fetch attempts
    pub backoff: BackoffKind,

    /// Base wait between attempts (milliseconds)
    pub backoff_base_ms: u64,

    /// Number of concurrent fetch workers
    pub concurrency: u32,

    /// Global request cap per second (0 disables the cap)
    pub rate_limit: u32,

    /// Value sent as the User-Agent header
    pub user_agent: String,

    /// A discovered link must match one of these when non-empty
    pub include_patterns: Vec<String>,

    /// A discovered link matching any of these is never enqueued
    pub exclude_patterns: Vec<String>,

    /// Whether links past the seed are followed at all
    pub follow_links: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            delay_ms: 500,
            timeout_secs: 30,
            retries: 3,
            backoff: BackoffKind::Exponential,
            backoff_base_ms: 1000,
            concurrency: 10,
            rate_limit: 10,
            user_agent: "DocParser/1.0".to_string(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            follow_links: true,
        }
    }
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Wait before the attempt following `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = Duration::from_millis(self.backoff_base_ms);
        match self.backoff {
            BackoffKind::Fixed => base,
            BackoffKind::Exponential => {
                let factor = 1u32
                    .checked_shl(attempt.saturating_sub(1))
                    .unwrap_or(u32::MAX);
                base.saturating_mul(factor)
            }
        }
    }
}

/// Wait strategy between fetch attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackoffKind {
    /// Same wait before every retry
    Fixed,
    /// Wait doubles after every failed attempt
    Exponential,
}

/// Output configuration, consumed by exporters rather than the crawler
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Exporter selector (see [`OUTPUT_FORMATS`])
    pub format: String,

    /// Whether exporters should also save page assets
    pub save_assets: bool,

    /// Directory exporters write into
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "markdown".to_string(),
            save_assets: false,
            directory: "output".to_string(),
        }
    }
}

/// Chunking configuration for retrieval output
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RagConfig {
    /// Attach chunked content to every page result
    pub enabled: bool,

    /// Character count at which a text chunk is flushed
    pub chunk_size: usize,

    /// Accepted for compatibility; chunks are built without overlap
    pub chunk_overlap: usize,

    /// Accepted for compatibility; short chunks are kept as-is
    pub min_chunk_size: usize,

    pub extract_code_blocks: bool,
    pub extract_tables: bool,
    pub extract_lists: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chunk_size: 1000,
            chunk_overlap: 200,
            min_chunk_size: 100,
            extract_code_blocks: true,
            extract_tables: true,
            extract_lists: true,
        }
    }
}

/// A user-defined site profile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProfileEntry {
    pub name: String,
    pub description: String,
    pub hostnames: Vec<String>,
    pub url_patterns: Vec<String>,
    pub meta_generator: Vec<String>,
    pub content_selectors: Vec<String>,
    pub navigation_selectors: Vec<String>,
    pub ignore_selectors: Vec<String>,
}
