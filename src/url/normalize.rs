use url::{form_urlencoded, Position, Url};

/// Query parameters that only carry tracking noise
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_content",
    "utm_term",
    "fbclid",
    "gclid",
    "msclkid",
    "wbraid",
    "gbraid",
    "ref",
    "source",
    "campaign",
    "medium",
    "content",
    "term",
    "_ga",
    "_gl",
    "mc_cid",
    "mc_eid",
];

/// Structural normalization, used for frontier membership
///
/// # Normalization Steps
///
/// 1. Parse the URL; on failure return the input unchanged
/// 2. Remove the fragment
/// 3. Remove trailing slashes from the path, except for the root `/`
///
/// Scheme, host, path, and query otherwise pass through as the URL parser
/// serializes them.
///
/// # Examples
///
/// ```
/// use sitescrape::url::normalize_structural;
///
/// assert_eq!(normalize_structural("https://a.test/docs/#intro"), "https://a.test/docs");
/// assert_eq!(normalize_structural("https://a.test/"), "https://a.test/");
/// ```
pub fn normalize_structural(url_str: &str) -> String {
    let mut url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(_) => return url_str.to_string(),
    };

    url.set_fragment(None);

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    url.to_string()
}

/// Dedup normalization, used for "already visited" decisions
///
/// # Normalization Steps
///
/// 1. Trim and lowercase the whole URL
/// 2. Parse it; on failure return the trimmed, lowercased input
/// 3. Drop tracking query parameters and parameters with blank values,
///    re-encoding the rest in their original order
/// 4. Remove the fragment
/// 5. Remove trailing slashes from the path, including the root
///
/// The result is lowercased once more because the parser emits uppercase
/// percent-escapes; this keeps the function idempotent.
///
/// # Examples
///
/// ```
/// use sitescrape::url::normalize_for_dedup;
///
/// assert_eq!(
///     normalize_for_dedup("https://A.test/Page/?utm_source=x&id=7#top"),
///     "https://a.test/page?id=7"
/// );
/// assert_eq!(normalize_for_dedup("https://a.test/"), "https://a.test");
/// ```
pub fn normalize_for_dedup(url_str: &str) -> String {
    let lowered = url_str.trim().to_lowercase();

    let url = match Url::parse(&lowered) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot parse {} for dedup normalization: {}", lowered, e);
            return lowered;
        }
    };

    let mut normalized = String::with_capacity(lowered.len());
    normalized.push_str(&url[..Position::AfterPort]);
    normalized.push_str(url.path().trim_end_matches('/'));

    let query = filtered_query(&url);
    if !query.is_empty() {
        normalized.push('?');
        normalized.push_str(&query);
    }

    normalized.to_lowercase()
}

/// Re-encodes the query without tracking or blank-valued parameters
fn filtered_query(url: &Url) -> String {
    if url.query().is_none() {
        return String::new();
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in url.query_pairs() {
        if value.is_empty() || is_tracking_param(&key) {
            continue;
        }
        serializer.append_pair(&key, &value);
    }
    serializer.finish()
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    TRACKING_PARAMS.contains(&key.as_str()) || key.starts_with("utm_")
}
