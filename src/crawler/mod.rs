//! Crawler module for dictionary page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - HTML extraction of categories, listing anchors and videos
//! - Anchor text parsing and link classification
//! - The per-category frontier and the overall crawl engine

mod classifier;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod text;

pub use classifier::{classify, classify_anchors, ClassifiedLinks};
pub use coordinator::{run_crawl, CrawlEngine};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::Frontier;
pub use parser::{extract_category_anchors, extract_listing_anchors, extract_video_sources, Anchor};
pub use text::{normalize_gloss, parse_anchor_text, ParsedText};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch the category index
/// 3. Crawl each category from `start_from` (1-based) into its backup file
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed successfully
/// * `Err(HarvestError)` - Crawl failed; `category_index()` tells where to resume
pub async fn crawl(config: &Config, start_from: usize) -> Result<CrawlReport, HarvestError> {
    run_crawl(config, start_from).await
}
