//! Crawl session - the frontier loop
//!
//! A [`CrawlSession`] owns everything one crawl needs: the site scope, the
//! HTTP client (connection pool), the content extractor, and the frontier.
//! It is driven one page at a time through [`CrawlSession::next_page`], so
//! batch collection and event streaming share the same loop.

use crate::config::Config;
use crate::crawler::extractor::ContentExtractor;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_links;
use crate::crawler::record::{DegenerateReason, PageOutcome};
use crate::output::{CrawlEvent, CrawlReport, CrawlStats, Progress};
use crate::url::{parse_seed_url, SiteScope};
use crate::{HarvestError, UrlError};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Buffered events between the crawl task and a stream consumer
const STREAM_CHANNEL_CAPACITY: usize = 32;

/// Lifecycle of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Created, nothing fetched yet
    Idle,
    /// At least one page has been fetched and the loop can continue
    Running,
    /// Done: the frontier ran dry
    Exhausted,
    /// Done: the page budget was reached
    BudgetReached,
}

impl CrawlState {
    /// Returns true once the session will produce no more pages
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Exhausted | Self::BudgetReached)
    }
}

/// A fetched page: its outcome plus the HTML it came from, if any
struct ScrapedPage {
    outcome: PageOutcome,
    html: Option<HtmlPage>,
}

struct HtmlPage {
    final_url: String,
    body: String,
}

/// One crawl from one seed
///
/// Sessions are never shared; concurrent crawls each create their own.
pub struct CrawlSession {
    seed: Url,
    scope: SiteScope,
    client: Client,
    extractor: ContentExtractor,
    frontier: Frontier,
    budget: usize,
    unlimited: bool,
    pacing_delay: Duration,
    progress_interval: usize,
    produced: usize,
    state: CrawlState,
    stats: CrawlStats,
    started: Instant,
}

impl CrawlSession {
    /// Creates a new session
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL; must be `http`/`https` with a host
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Ready to crawl
    /// * `Err(HarvestError)` - Invalid seed or the HTTP client could not be built
    pub fn new(seed: &str, config: &Config) -> Result<Self, HarvestError> {
        let seed = parse_seed_url(seed)?;
        let scope = SiteScope::from_seed(&seed).ok_or(UrlError::MissingDomain)?;
        let client = build_http_client(&config.user_agent, config.crawler.timeout)?;
        let frontier = Frontier::new(seed.as_str());

        tracing::debug!(
            "New crawl session for {} (domain {}, budget {})",
            seed,
            scope.domain(),
            config.crawler.max_pages
        );

        Ok(Self {
            seed,
            scope,
            client,
            extractor: ContentExtractor::new(&config.extraction.boilerplate),
            frontier,
            budget: config.crawler.max_pages,
            unlimited: config.crawler.is_unlimited(),
            pacing_delay: Duration::from_millis(config.crawler.pacing_delay),
            progress_interval: config.crawler.progress_interval.max(1),
            produced: 0,
            state: CrawlState::Idle,
            stats: CrawlStats::default(),
            started: Instant::now(),
        })
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Number of page records produced so far
    pub fn pages_produced(&self) -> usize {
        self.produced
    }

    /// Number of URLs waiting in the frontier
    pub fn queue_size(&self) -> usize {
        self.frontier.len()
    }

    /// Fetches the next page in breadth-first order
    ///
    /// # Loop Body
    ///
    /// 1. Stop if the page budget is reached
    /// 2. Pop the frontier head; stop if the frontier is empty
    /// 3. Skip it if its dedup form was already visited
    /// 4. Mark it visited, fetch it, and build its record
    /// 5. If it was HTML, mark the post-redirect URL visited too and enqueue
    ///    new links found in the same body
    ///
    /// # Returns
    ///
    /// * `Some(PageOutcome)` - Exactly one outcome per fetched URL
    /// * `None` - The session is done; see [`CrawlSession::state`]
    pub async fn next_page(&mut self) -> Option<PageOutcome> {
        if self.produced >= self.budget {
            self.state = CrawlState::BudgetReached;
            return None;
        }

        loop {
            let Some(url) = self.frontier.pop() else {
                self.state = CrawlState::Exhausted;
                return None;
            };

            if !self.frontier.mark_visited(&url) {
                tracing::debug!("Skipping already visited {}", url);
                self.stats.duplicates_skipped += 1;
                continue;
            }

            self.state = CrawlState::Running;

            let page = scrape_page(&self.client, &self.extractor, &url).await;
            if let Some(html) = &page.html {
                if self.frontier.mark_visited(&html.final_url) {
                    tracing::debug!("{} redirected to {}", url, html.final_url);
                }
                self.enqueue_links(html);
            }

            self.produced += 1;
            self.stats.record(&page.outcome);

            if self.produced >= self.budget {
                self.state = CrawlState::BudgetReached;
            }

            return Some(page.outcome);
        }
    }

    /// Adds unvisited same-site links from a fetched page to the frontier tail
    fn enqueue_links(&mut self, html: &HtmlPage) {
        let base = match Url::parse(&html.final_url) {
            Ok(base) => base,
            Err(e) => {
                tracing::error!("Error extracting links from {}: {}", html.final_url, e);
                return;
            }
        };

        let links = extract_links(&html.body, &base, &self.scope, self.frontier.visited());
        let found = links.len();
        let added = links
            .into_iter()
            .filter(|link| self.frontier.push(link.clone()))
            .count();

        self.stats.links_enqueued += added;
        tracing::debug!(
            "Found {} links on {}, {} new. Frontier size: {}",
            found,
            html.final_url,
            added,
            self.frontier.len()
        );
    }

    /// Runs the crawl to completion and collects every record
    pub async fn run(mut self) -> CrawlReport {
        tracing::info!("Starting crawl of {}", self.seed);

        let mut pages = Vec::new();
        while let Some(outcome) = self.next_page().await {
            pages.push(outcome.into_record());
        }

        tracing::info!(
            "Crawling completed. Scraped {} pages in {:?}",
            pages.len(),
            self.started.elapsed()
        );

        CrawlReport {
            seed: self.seed.to_string(),
            pages,
            state: self.state,
            stats: self.stats,
            elapsed: self.started.elapsed(),
        }
    }

    /// Runs the crawl on a background task, emitting events as pages arrive
    ///
    /// Must be called from within a Tokio runtime. Dropping the returned
    /// stream stops the crawl after the page in flight.
    pub fn stream(self) -> CrawlStream {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let task = tokio::spawn(self.stream_into(tx));
        CrawlStream {
            events: rx,
            task: Some(task),
        }
    }

    async fn stream_into(mut self, tx: mpsc::Sender<CrawlEvent>) {
        let total = if self.unlimited {
            None
        } else {
            Some(self.budget)
        };

        if tx.send(CrawlEvent::start(self.seed.as_str())).await.is_err() {
            return;
        }

        while let Some(outcome) = self.next_page().await {
            let current = self.produced;
            let progress = Progress::new(current, total, self.frontier.len());

            if tx
                .send(CrawlEvent::page(outcome.into_record(), progress))
                .await
                .is_err()
            {
                tracing::debug!("Stream consumer went away, stopping crawl of {}", self.seed);
                return;
            }

            // No pause after the final page
            if !self.pacing_delay.is_zero()
                && !self.state.is_done()
                && !self.frontier.is_empty()
            {
                tokio::time::sleep(self.pacing_delay).await;
            }

            if total.is_none()
                && current % self.progress_interval == 0
                && tx.send(CrawlEvent::progress(current)).await.is_err()
            {
                return;
            }
        }

        tracing::info!(
            "Streaming crawl of {} completed with {} pages",
            self.seed,
            self.produced
        );
        let _ = tx.send(CrawlEvent::complete(self.produced)).await;
    }
}

/// Events from a streaming crawl
///
/// Yields `start`, one `page` per record (with periodic `progress` events
/// for unlimited crawls), then `complete`. If the crawl task dies, a final
/// `error` event is yielded instead of `complete`; pages already emitted
/// stand.
pub struct CrawlStream {
    events: mpsc::Receiver<CrawlEvent>,
    task: Option<JoinHandle<()>>,
}

impl CrawlStream {
    /// Waits for the next event; `None` once the stream is finished
    pub async fn next(&mut self) -> Option<CrawlEvent> {
        if let Some(event) = self.events.recv().await {
            return Some(event);
        }

        let task = self.task.take()?;
        match task.await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Error during streaming crawl: {}", e);
                Some(CrawlEvent::error(format!("Crawl task failed: {}", e)))
            }
        }
    }
}

/// Fetches one URL and builds its outcome
async fn scrape_page(client: &Client, extractor: &ContentExtractor, url: &str) -> ScrapedPage {
    tracing::info!("Scraping: {}", url);

    match fetch_url(client, url).await {
        FetchResult::Html {
            final_url, body, ..
        } => {
            let record = extractor.extract(&body, url);
            ScrapedPage {
                outcome: PageOutcome::Extracted(record),
                html: Some(HtmlPage { final_url, body }),
            }
        }

        FetchResult::NonHtml { content_type } => {
            tracing::warn!("Skipping non-HTML content: {} ({})", url, content_type);
            degenerate(url, DegenerateReason::NonHtml { content_type })
        }

        FetchResult::HttpError { status_code } => {
            tracing::error!("Request error for {}: HTTP {}", url, status_code);
            degenerate(url, DegenerateReason::HttpStatus { status_code })
        }

        FetchResult::NetworkError { error } => {
            tracing::error!("Request error for {}: {}", url, error);
            degenerate(url, DegenerateReason::Network { error })
        }

        FetchResult::BodyError { error } => {
            tracing::error!("Error reading body of {}: {}", url, error);
            degenerate(url, DegenerateReason::Unreadable { error })
        }
    }
}

fn degenerate(url: &str, reason: DegenerateReason) -> ScrapedPage {
    ScrapedPage {
        outcome: PageOutcome::degenerate(url, reason),
        html: None,
    }
}

/// Scrapes a single page without following any links
///
/// # Example
///
/// ```no_run
/// use sitescrape::config::Config;
/// use sitescrape::crawler::scrape_single;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = scrape_single("https://example.com/article", &Config::default()).await?;
/// println!("{}", outcome.record().title());
/// # Ok(())
/// # }
/// ```
pub async fn scrape_single(url: &str, config: &Config) -> Result<PageOutcome, HarvestError> {
    let url = parse_seed_url(url)?;
    let client = build_http_client(&config.user_agent, config.crawler.timeout)?;
    let extractor = ContentExtractor::new(&config.extraction.boilerplate);

    let page = scrape_page(&client, &extractor, url.as_str()).await;
    Ok(page.outcome)
}
