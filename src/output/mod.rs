//! Output module for crawl results
//!
//! This module handles:
//! - Streaming events and their server-sent-event framing
//! - The batch report and its JSON rendering
//! - Recording and printing crawl statistics

mod events;
mod report;
pub mod stats;

pub use events::{CrawlEvent, Progress};
pub use report::{pages_to_json, CrawlReport};
pub use stats::{print_statistics, CrawlStats};
