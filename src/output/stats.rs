//! Per-phase harvest statistics
//!
//! Counters are updated by the crawlers after each batch settles and printed
//! once a phase finishes.

use chrono::{DateTime, Utc};

/// Counters for one run of the page-index crawler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCrawlStats {
    /// Batches that ran to completion
    pub batches: u64,

    /// Listing pages requested
    pub pages_fetched: u64,

    /// Pages answered with a non-2xx status
    pub pages_non_success: u64,

    /// Pages skipped because an expected element was missing
    pub pages_malformed: u64,

    /// Article records collected
    pub records_found: u64,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Counters for one run of the article-body crawler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleCrawlStats {
    /// Windows that ran to completion
    pub windows: u64,

    /// Article pages requested
    pub fetched: u64,

    /// Articles answered with a non-2xx status
    pub non_success: u64,

    /// Records skipped for carrying the reserved basename prefix
    pub skipped_marker: u64,

    /// Records skipped because their file already existed
    pub skipped_existing: u64,

    /// Records whose href has no usable file name
    pub skipped_unnamed: u64,

    /// Articles skipped because the content container was missing
    pub malformed: u64,

    /// Article files written
    pub written: u64,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

fn duration_seconds(
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
) -> Option<i64> {
    match (started_at, finished_at) {
        (Some(start), Some(finish)) => Some((finish - start).num_seconds()),
        _ => None,
    }
}

impl PageCrawlStats {
    /// Wall-clock duration of the phase in whole seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        duration_seconds(self.started_at, self.finished_at)
    }
}

impl ArticleCrawlStats {
    /// Wall-clock duration of the phase in whole seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        duration_seconds(self.started_at, self.finished_at)
    }

    /// Records that never reached the network
    pub fn skipped(&self) -> u64 {
        self.skipped_marker + self.skipped_existing + self.skipped_unnamed
    }
}

/// Prints page-phase statistics to stdout
pub fn print_page_statistics(stats: &PageCrawlStats) {
    println!("=== Page Index Statistics ===\n");

    println!("  Batches: {}", stats.batches);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Non-success responses: {}", stats.pages_non_success);
    if stats.pages_malformed > 0 {
        println!("  Malformed pages skipped: {}", stats.pages_malformed);
    }
    println!("  Article records: {}", stats.records_found);

    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {} seconds", seconds);
    }
}

/// Prints article-phase statistics to stdout
pub fn print_article_statistics(stats: &ArticleCrawlStats) {
    println!("=== Article Statistics ===\n");

    println!("  Windows: {}", stats.windows);
    println!("  Articles fetched: {}", stats.fetched);
    println!("  Non-success responses: {}", stats.non_success);
    println!("  Skipped (alternate rendering): {}", stats.skipped_marker);
    if stats.skipped_existing > 0 {
        println!("  Skipped (already stored): {}", stats.skipped_existing);
    }
    if stats.skipped_unnamed > 0 {
        println!("  Skipped (no file name): {}", stats.skipped_unnamed);
    }
    if stats.malformed > 0 {
        println!("  Malformed articles skipped: {}", stats.malformed);
    }
    println!("  Files written: {}", stats.written);

    let success_rate = if stats.fetched > 0 {
        (stats.written as f64 / stats.fetched as f64) * 100.0
    } else {
        0.0
    };
    println!("  Success rate: {:.1}%", success_rate);

    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {} seconds", seconds);
    }
}
