//! Sitescrape: a same-site content harvester
//!
//! This crate crawls a website breadth-first from a seed URL, staying on the
//! seed's host, and turns every fetched page into a normalized content record
//! (title plus cleaned body text).

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Sitescrape operations
///
/// Per-page failures (timeouts, HTTP errors, non-HTML bodies) are not errors;
/// they become degenerate page records. This type only covers failures that
/// happen before a crawl starts or while emitting its results.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("No content could be scraped from {url}")]
    NoContent { url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("URL must use HTTP or HTTPS protocol, got: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingDomain,
}

/// Result type alias for Sitescrape operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    crawl, scrape_single, CrawlSession, CrawlState, CrawlStream, DegenerateReason, PageOutcome,
    PageRecord,
};
pub use output::{CrawlEvent, CrawlReport, CrawlStats};
pub use url::{normalize_for_dedup, normalize_structural, parse_seed_url, SiteScope};
