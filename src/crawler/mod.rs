//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with Content-Type gating
//! - Content extraction into page records
//! - Link discovery and the breadth-first frontier
//! - Overall crawl coordination (batch and streaming)

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod parser;
mod record;

pub use coordinator::{scrape_single, CrawlSession, CrawlState, CrawlStream};
pub use extractor::{extract_content, ContentExtractor, EMPTY_CONTENT_PLACEHOLDER};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::Frontier;
pub use parser::extract_links;
pub use record::{
    format_timestamp, DegenerateReason, PageOutcome, PageRecord, NON_HTML_CONTENT, NON_HTML_TITLE,
};

pub(crate) use record::serialize_timestamp;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::HarvestError;

/// Runs a complete batch crawl
///
/// This is the main entry point for collecting a whole site. It will:
/// 1. Validate the seed and build the session's HTTP client
/// 2. Fetch pages breadth-first until the budget or the frontier runs out
/// 3. Return every record in production order
///
/// # Arguments
///
/// * `seed` - The seed URL
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (it may hold degenerate records)
/// * `Err(HarvestError)` - The crawl could not start
pub async fn crawl(seed: &str, config: &Config) -> Result<CrawlReport, HarvestError> {
    let session = CrawlSession::new(seed, config)?;
    Ok(session.run().await)
}
