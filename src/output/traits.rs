//! Output writer trait and errors
//!
//! Exporters consume a finished `CrawlResult`; the trait keeps the binary
//! independent of the concrete file format.

use super::CrawlResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for sinks that persist a crawl result
pub trait ResultWriter {
    /// Writes the whole result
    fn write_result(&self, result: &CrawlResult) -> OutputResult<()>;
}
