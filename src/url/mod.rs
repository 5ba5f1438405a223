//! URL handling module for Sitescrape
//!
//! This module provides the two URL normalization strengths, same-site
//! scoping, and validation of crawl seeds.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, SiteScope};
pub use normalize::{normalize_for_dedup, normalize_structural};

/// Validates a seed URL before any network activity
///
/// The seed must parse, use the `http` or `https` scheme, and carry a
/// non-empty host.
///
/// # Examples
///
/// ```
/// use sitescrape::url::parse_seed_url;
///
/// assert!(parse_seed_url("https://example.com").is_ok());
/// assert!(parse_seed_url("ftp://example.com").is_err());
/// assert!(parse_seed_url("example.com").is_err());
/// ```
pub fn parse_seed_url(seed: &str) -> UrlResult<Url> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain),
    }
}
