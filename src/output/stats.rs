//! Per-crawl statistics
//!
//! Counts page outcomes as a session produces them and prints a human
//! summary at the end of a run.

use crate::crawler::{DegenerateReason, PageOutcome};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages whose HTML content was extracted
    pub extracted: usize,

    /// Pages skipped because they were not HTML
    pub non_html: usize,

    /// Pages that answered with a non-2xx status
    pub http_errors: usize,

    /// Pages that never produced a response
    pub network_errors: usize,

    /// Pages whose body could not be read
    pub unreadable: usize,

    /// Frontier entries dropped because their dedup form was already visited
    pub duplicates_skipped: usize,

    /// Links added to the frontier
    pub links_enqueued: usize,
}

impl CrawlStats {
    /// Counts one produced page
    pub fn record(&mut self, outcome: &PageOutcome) {
        match outcome.reason() {
            None => self.extracted += 1,
            Some(DegenerateReason::NonHtml { .. }) => self.non_html += 1,
            Some(DegenerateReason::HttpStatus { .. }) => self.http_errors += 1,
            Some(DegenerateReason::Network { .. }) => self.network_errors += 1,
            Some(DegenerateReason::Unreadable { .. }) => self.unreadable += 1,
        }
    }

    /// Total pages produced
    pub fn total_pages(&self) -> usize {
        self.extracted + self.degenerate()
    }

    /// Pages that produced placeholder records
    pub fn degenerate(&self) -> usize {
        self.non_html + self.http_errors + self.network_errors + self.unreadable
    }

    /// Share of produced pages that were extracted, in percent
    pub fn success_rate(&self) -> f64 {
        let total = self.total_pages();
        if total > 0 {
            (self.extracted as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for crawl output.
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStats) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Total pages scraped: {}", stats.total_pages());
    eprintln!("  Links enqueued: {}", stats.links_enqueued);
    eprintln!("  Duplicates skipped: {}", stats.duplicates_skipped);
    eprintln!();

    eprintln!("Pages by Outcome:");
    let mut outcome_counts = vec![
        ("Extracted", stats.extracted),
        ("Non-HTML", stats.non_html),
        ("HTTP error", stats.http_errors),
        ("Network error", stats.network_errors),
        ("Unreadable", stats.unreadable),
    ];
    outcome_counts.retain(|(_, count)| *count > 0);
    outcome_counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total = stats.total_pages();
    for (label, count) in outcome_counts {
        let percentage = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        eprintln!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    eprintln!();

    eprintln!(
        "Success Rate: {:.1}% ({} / {} pages extracted)",
        stats.success_rate(),
        stats.extracted,
        total
    );
}
