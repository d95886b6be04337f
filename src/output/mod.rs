//! Output module for harvest reports
//!
//! This module handles recording and printing per-phase statistics.

pub mod stats;

pub use stats::{print_article_statistics, print_page_statistics, ArticleCrawlStats, PageCrawlStats};
