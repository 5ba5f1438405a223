//! Link discovery
//!
//! This module parses HTML anchors and turns them into frontier candidates:
//! absolute, same-site, not yet visited, structurally normalized URLs.

use crate::url::{normalize_for_dedup, normalize_structural, SiteScope};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts in-scope, unvisited links from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` resolved against `base_url`, whose host is
/// in `scope`, and whose dedup-normalized form is not in `visited`.
///
/// **Exclude:**
/// - empty hrefs and fragment-only links (`#...`)
/// - `mailto:`, `tel:`, `javascript:`, and `data:` links
/// - anything that does not resolve to an `http`/`https` URL
///
/// Returned URLs are structurally normalized, deduplicated, and in
/// document order.
///
/// # Example
///
/// ```
/// use sitescrape::crawler::extract_links;
/// use sitescrape::url::SiteScope;
/// use std::collections::HashSet;
/// use url::Url;
///
/// let base = Url::parse("https://a.test/").unwrap();
/// let scope = SiteScope::from_seed(&base).unwrap();
/// let html = r#"<a href="/docs/">Docs</a><a href="https://b.test/">Elsewhere</a>"#;
///
/// let links = extract_links(html, &base, &scope, &HashSet::new());
/// assert_eq!(links, vec!["https://a.test/docs".to_string()]);
/// ```
pub fn extract_links(
    html: &str,
    base_url: &Url,
    scope: &SiteScope,
    visited: &HashSet<String>,
) -> Vec<String> {
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::error!("Error extracting links from {}: {:?}", base_url, e);
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute) = resolve_link(href, base_url) else {
            continue;
        };

        if !scope.contains(&absolute) {
            tracing::trace!("Skipping off-site link {}", absolute);
            continue;
        }

        if visited.contains(&normalize_for_dedup(absolute.as_str())) {
            tracing::trace!("Skipping visited link {}", absolute);
            continue;
        }

        let normalized = normalize_structural(absolute.as_str());
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty and fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - unresolvable or non-HTTP(S) URLs
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Cannot resolve link {} against {}: {}", href, base_url, e);
            None
        }
    }
}
