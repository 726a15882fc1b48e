//! Crawl run report
//!
//! Counters collected while the engine runs, printed when the crawl ends.

use chrono::{DateTime, Utc};

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Categories found on the index page (after de-duplication)
    pub categories_total: usize,

    /// Categories whose frontier was fully drained in this run
    pub categories_completed: usize,

    /// Sign records written across all categories
    pub records_written: usize,

    /// Sign pages without a video element
    pub missing_videos: usize,

    /// Listing pages fetched through a continuation link
    pub continuation_pages_expanded: usize,

    /// Continuation links dropped because their page was already expanded
    pub continuation_pages_skipped: usize,

    /// Links whose href could not be turned into a URL
    pub unresolvable_links: usize,

    /// Listing pages with a single pagination control, kept for manual review
    pub ambiguous_pages: Vec<String>,
}

impl CrawlReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            categories_total: 0,
            categories_completed: 0,
            records_written: 0,
            missing_videos: 0,
            continuation_pages_expanded: 0,
            continuation_pages_skipped: 0,
            unresolvable_links: 0,
            ambiguous_pages: Vec::new(),
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");
    println!("Started:  {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = report.duration_seconds() {
        println!("Duration: {}s", seconds);
    }

    println!(
        "\nCategories: {}/{} completed",
        report.categories_completed, report.categories_total
    );
    println!("Records written: {}", report.records_written);
    println!("Sign pages without video: {}", report.missing_videos);
    println!(
        "Continuation pages: {} expanded, {} skipped as visited",
        report.continuation_pages_expanded, report.continuation_pages_skipped
    );
    if report.unresolvable_links > 0 {
        println!("Unresolvable links skipped: {}", report.unresolvable_links);
    }

    if !report.ambiguous_pages.is_empty() {
        println!(
            "\nPages with a single pagination link ({}), check manually:",
            report.ambiguous_pages.len()
        );
        for url in &report.ambiguous_pages {
            println!("  - {}", url);
        }
    }
}
