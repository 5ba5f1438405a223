//! Batch crawl results

use crate::crawler::{CrawlState, PageRecord};
use crate::output::stats::CrawlStats;
use crate::HarvestError;
use serde::Serialize;
use std::time::Duration;

/// Everything a finished batch crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The validated seed URL
    pub seed: String,

    /// Records in production order, the seed's first
    pub pages: Vec<PageRecord>,

    /// Why the crawl stopped
    pub state: CrawlState,

    /// Outcome counts
    pub stats: CrawlStats,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Batch output entry: `{ "data": PageRecord }`
#[derive(Serialize)]
struct ScrapedPage<'a> {
    data: &'a PageRecord,
}

impl CrawlReport {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Fails with [`HarvestError::NoContent`] when nothing was scraped
    pub fn ensure_not_empty(self) -> Result<Self, HarvestError> {
        if self.is_empty() {
            return Err(HarvestError::NoContent { url: self.seed });
        }
        Ok(self)
    }

    /// Renders the records as a pretty JSON array of `{ "data": ... }` objects
    pub fn to_json(&self) -> Result<String, HarvestError> {
        Ok(pages_to_json(&self.pages)?)
    }
}

/// Renders records in the batch output format
pub fn pages_to_json(pages: &[PageRecord]) -> serde_json::Result<String> {
    let entries: Vec<ScrapedPage<'_>> = pages.iter().map(|data| ScrapedPage { data }).collect();
    serde_json::to_string_pretty(&entries)
}
