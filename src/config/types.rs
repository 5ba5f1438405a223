use serde::Deserialize;

/// Page budget that means "crawl everything reachable"
pub const UNLIMITED_PAGES: usize = 999_999;

/// Main configuration structure for Sitescrape
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    pub timeout: u64,

    /// Maximum number of pages to produce records for
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Pause between pages when streaming (milliseconds)
    #[serde(rename = "pacing-delay")]
    pub pacing_delay: u64,

    /// Unlimited streams report progress every this many pages
    #[serde(rename = "progress-interval")]
    pub progress_interval: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout: 10,
            max_pages: 100,
            pacing_delay: 200,
            progress_interval: 1000,
        }
    }
}

impl CrawlerConfig {
    /// Returns true if the page budget is the "unlimited" sentinel
    pub fn is_unlimited(&self) -> bool {
        self.max_pages >= UNLIMITED_PAGES
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/sitescrape/sitescrape".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Content extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extra boilerplate phrases stripped from page text, on top of the built-in list
    pub boilerplate: Vec<String>,
}
