use url::Url;

/// Extracts the site authority (lowercase host plus any explicit port) from a URL
///
/// Default ports are omitted by the URL parser, so `http://example.com:80/`
/// and `http://example.com/` yield the same authority.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitescrape::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// The set of hosts a crawl may follow links into
///
/// A candidate is in scope when its authority equals the crawl's domain,
/// equals `www.` + domain, or equals the domain with a leading `www.`
/// stripped. Other subdomains are out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    domain: String,
}

impl SiteScope {
    /// Creates a scope rooted at the seed URL's authority
    ///
    /// Returns `None` if the seed has no host.
    pub fn from_seed(seed: &Url) -> Option<Self> {
        extract_domain(seed).map(|domain| Self { domain })
    }

    /// The seed's authority
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns true if the URL belongs to this site
    pub fn contains(&self, url: &Url) -> bool {
        match extract_domain(url) {
            Some(candidate) => self.matches_domain(&candidate),
            None => false,
        }
    }

    /// Same-domain test on a raw URL string; unparseable URLs are out of scope
    pub fn contains_str(&self, url: &str) -> bool {
        Url::parse(url).map(|u| self.contains(&u)).unwrap_or(false)
    }

    fn matches_domain(&self, candidate: &str) -> bool {
        if candidate == self.domain {
            return true;
        }

        if candidate.strip_prefix("www.") == Some(self.domain.as_str()) {
            return true;
        }

        self.domain.strip_prefix("www.") == Some(candidate)
    }
}
