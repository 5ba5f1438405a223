//! Streaming crawl events
//!
//! Each event serializes to a flat JSON object tagged by `type`, and can be
//! framed as a server-sent-event `data:` line.

use crate::crawler::{serialize_timestamp, PageRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Crawl position attached to every `page` event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// Pages produced so far, including this one
    pub current: usize,

    /// Page budget; `None` for unlimited crawls
    pub total: Option<usize>,

    /// `current / total` as a percentage capped at 100; `None` when unlimited
    pub percentage: Option<f64>,

    /// URLs still waiting in the frontier
    pub queue_size: usize,
}

impl Progress {
    pub fn new(current: usize, total: Option<usize>, queue_size: usize) -> Self {
        let percentage = total
            .filter(|t| *t > 0)
            .map(|t| (current as f64 * 100.0 / t as f64).min(100.0));

        Self {
            current,
            total,
            percentage,
            queue_size,
        }
    }
}

/// An event emitted by a streaming crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CrawlEvent {
    Start {
        message: String,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
    },

    Page {
        data: PageRecord,
        progress: Progress,
    },

    Progress {
        message: String,
        current: usize,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
    },

    Complete {
        message: String,
        total_pages: usize,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
    },

    Error {
        message: String,
        #[serde(serialize_with = "serialize_timestamp")]
        timestamp: DateTime<Utc>,
    },
}

impl CrawlEvent {
    pub fn start(seed: &str) -> Self {
        Self::Start {
            message: format!("Starting crawl of {}", seed),
            timestamp: Utc::now(),
        }
    }

    pub fn page(data: PageRecord, progress: Progress) -> Self {
        Self::Page { data, progress }
    }

    pub fn progress(current: usize) -> Self {
        Self::Progress {
            message: format!("Scraped {} pages so far, still crawling", current),
            current,
            timestamp: Utc::now(),
        }
    }

    pub fn complete(total_pages: usize) -> Self {
        Self::Complete {
            message: format!("Crawl finished, scraped {} pages", total_pages),
            total_pages,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// The `type` tag of this event
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Page { .. } => "page",
            Self::Progress { .. } => "progress",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
        }
    }

    /// Returns true for events after which nothing else is emitted
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }

    /// Renders the event as one server-sent-event frame: `data: <json>\n\n`
    ///
    /// # Example
    ///
    /// ```
    /// use sitescrape::output::CrawlEvent;
    ///
    /// let frame = CrawlEvent::error("boom").to_sse_frame().unwrap();
    /// assert!(frame.starts_with("data: {\"type\":\"error\""));
    /// assert!(frame.ends_with("\n\n"));
    /// ```
    pub fn to_sse_frame(&self) -> serde_json::Result<String> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}
