//! Configuration module for Doc-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use doc_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BackoffKind, Config, CrawlerConfig, OutputConfig, ProfileEntry, RagConfig, OUTPUT_FORMATS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};

pub(crate) use validation::{validate, validate_crawler_config, validate_rag_config};
