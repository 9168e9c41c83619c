//! Doc-Harvest: a documentation site crawler
//!
//! This crate crawls a documentation website from a seed URL, extracts the
//! readable content and navigation of every page with generator-aware site
//! profiles, and splits the content into chunks ready for retrieval pipelines.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod profile;
pub mod rag;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Doc-Harvest operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Invalid seed URL {url}: {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::EntryState,
        to: state::EntryState,
    },

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Site profile errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Invalid URL pattern '{pattern}' in profile {profile}: {source}")]
    InvalidPattern {
        profile: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("Profile name cannot be empty")]
    EmptyName,

    #[error("Profile name '{0}' is reserved")]
    ReservedName(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Crawler};
pub use output::{CrawlResult, PageResult};
pub use profile::{ProfileKind, ProfileRegistry, SiteProfile};
pub use state::{CrawlStats, EntryState};
pub use crate::url::{is_same_domain, is_valid_url, matches_any_pattern, normalize_url};
