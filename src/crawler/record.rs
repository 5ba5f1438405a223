//! Page records and per-page outcomes
//!
//! Every fetched URL produces exactly one [`PageRecord`]. Whether that record
//! carries real content or documents a failure is tracked by [`PageOutcome`].

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Title given to records for responses that are not HTML
pub const NON_HTML_TITLE: &str = "Non-HTML Content";

/// Content given to records for responses that are not HTML
pub const NON_HTML_CONTENT: &str = "Skipped non-HTML content";

/// The unit of crawl output: one per fetched URL
///
/// Records are immutable once created. They serialize with the fields
/// `created_at`, `id`, `source_url`, `title`, `content`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    #[serde(serialize_with = "serialize_timestamp")]
    created_at: DateTime<Utc>,
    id: Uuid,
    source_url: String,
    title: String,
    content: String,
}

impl PageRecord {
    /// Creates a record with a fresh id and the current UTC time
    pub fn new(
        source_url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            id: Uuid::new_v4(),
            source_url: source_url.into(),
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Creation time as ISO-8601 with microseconds and a `Z` suffix
    pub fn created_at_iso(&self) -> String {
        format_timestamp(&self.created_at)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Formats a UTC timestamp as `YYYY-MM-DDTHH:MM:SS.ffffffZ`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn serialize_timestamp<S>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(timestamp))
}

/// Why a page produced a placeholder record instead of extracted content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegenerateReason {
    /// The response Content-Type was not `text/html`
    NonHtml { content_type: String },

    /// The server answered with a non-2xx status
    HttpStatus { status_code: u16 },

    /// The request never produced a response (timeout, DNS, refused connection)
    Network { error: String },

    /// Headers arrived but the body could not be read
    Unreadable { error: String },
}

impl DegenerateReason {
    /// Title for the placeholder record
    pub fn title(&self) -> &'static str {
        match self {
            Self::NonHtml { .. } => NON_HTML_TITLE,
            _ => "",
        }
    }

    /// Diagnostic content for the placeholder record
    pub fn describe(&self, url: &str) -> String {
        match self {
            Self::NonHtml { .. } => NON_HTML_CONTENT.to_string(),
            Self::HttpStatus { status_code } => {
                let reason = StatusCode::from_u16(*status_code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown Status");
                format!(
                    "Request error: {} {} for url: {}",
                    status_code, reason, url
                )
            }
            Self::Network { error } => format!("Request error: {}", error),
            Self::Unreadable { error } => format!("Error extracting content: {}", error),
        }
    }
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonHtml { content_type } => write!(f, "non-HTML content ({})", content_type),
            Self::HttpStatus { status_code } => write!(f, "HTTP {}", status_code),
            Self::Network { error } => write!(f, "network error: {}", error),
            Self::Unreadable { error } => write!(f, "unreadable body: {}", error),
        }
    }
}

/// The result of scraping one URL
///
/// Both variants carry a valid record; a degenerate record documents the
/// failure in its content so the crawl can continue.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// HTML was fetched and its content extracted
    Extracted(PageRecord),

    /// The page could not be extracted; the record is a placeholder
    Degenerate {
        record: PageRecord,
        reason: DegenerateReason,
    },
}

impl PageOutcome {
    /// Builds the placeholder outcome for a failed page
    pub fn degenerate(url: &str, reason: DegenerateReason) -> Self {
        let record = PageRecord::new(url, reason.title(), reason.describe(url));
        Self::Degenerate { record, reason }
    }

    pub fn record(&self) -> &PageRecord {
        match self {
            Self::Extracted(record) => record,
            Self::Degenerate { record, .. } => record,
        }
    }

    pub fn into_record(self) -> PageRecord {
        match self {
            Self::Extracted(record) => record,
            Self::Degenerate { record, .. } => record,
        }
    }

    pub fn reason(&self) -> Option<&DegenerateReason> {
        match self {
            Self::Extracted(_) => None,
            Self::Degenerate { reason, .. } => Some(reason),
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }
}
