//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the per-session HTTP client (connection pool, user agent, timeout)
//! - GET requests with Content-Type gating
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Html {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch); the body was not read
    NonHtml {
        /// The actual Content-Type received (empty if absent)
        content_type: String,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, DNS, etc.)
    NetworkError {
        /// Error description
        error: String,
    },

    /// Headers were received but reading the body failed
    BodyError {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client for one crawl session
///
/// The client owns a connection pool, so a session builds exactly one and
/// reuses it for every request.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout_secs` - Per-request timeout in seconds
///
/// # Example
///
/// ```no_run
/// use sitescrape::config::UserAgentConfig;
/// use sitescrape::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), 10).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(timeout_secs);

    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the response
///
/// # Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with `text/html` Content-Type | Html |
/// | 2xx with any other (or no) Content-Type | NonHtml |
/// | Non-2xx status | HttpError |
/// | Timeout, connection refused, DNS, TLS | NetworkError |
/// | Body read failure | BodyError |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return FetchResult::NetworkError { error: describe_error(&e) },
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if !content_type.contains("text/html") {
        return FetchResult::NonHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Html {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        },
        Err(e) => FetchResult::BodyError {
            error: e.to_string(),
        },
    }
}

/// Turns a request error into a short human description
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Too many redirects: {}", e)
    } else {
        e.to_string()
    }
}
