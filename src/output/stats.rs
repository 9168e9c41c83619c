//! Plain-text crawl statistics
//!
//! This module renders the counters of a finished crawl for the terminal.

use super::CrawlResult;
use std::fmt::{self, Write};

/// Renders crawl statistics as a block of text
///
/// # Arguments
///
/// * `result` - The finished crawl
pub fn format_statistics(result: &CrawlResult) -> String {
    StatisticsReport(result).to_string()
}

/// Display adapter over a finished crawl
pub struct StatisticsReport<'a>(pub &'a CrawlResult);

impl fmt::Display for StatisticsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statistics(f, self.0)
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(result: &CrawlResult) {
    print!("{}", StatisticsReport(result));
}

fn write_statistics(out: &mut impl Write, result: &CrawlResult) -> fmt::Result {
    let stats = &result.stats;

    writeln!(out, "=== Crawl Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Pages processed: {}", stats.processed)?;
    writeln!(out, "  Pages failed: {}", stats.failed)?;
    writeln!(out, "  Duplicates skipped: {}", stats.skipped)?;
    writeln!(out, "  URLs discovered: {}", stats.total_discovered)?;
    writeln!(
        out,
        "  Duration: {:.1}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    )?;
    if stats.cancelled {
        writeln!(out, "  Crawl was cancelled")?;
    }
    writeln!(out)?;

    writeln!(out, "Links not followed:")?;
    writeln!(out, "  Filtered by patterns: {}", stats.filtered)?;
    writeln!(out, "  Invalid or cross-domain: {}", stats.rejected)?;
    writeln!(out, "  Beyond depth limit: {}", stats.depth_limited)?;
    writeln!(out)?;

    let profiles = result.profile_counts();
    if !profiles.is_empty() {
        writeln!(out, "Pages by Profile:")?;
        // Sort profiles by count (descending)
        let mut profile_counts: Vec<_> = profiles.into_iter().collect();
        profile_counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

        for (profile, count) in profile_counts {
            writeln!(out, "  {}: {}", profile, count)?;
        }
        writeln!(out)?;
    }

    let chunks = result.chunk_count();
    if chunks > 0 {
        writeln!(out, "RAG chunks: {}", chunks)?;
        writeln!(out)?;
    }

    // Calculate success rate
    let attempted = stats.processed + stats.failed;
    let success_rate = if attempted > 0 {
        (stats.processed as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        success_rate, stats.processed, attempted
    )
}
