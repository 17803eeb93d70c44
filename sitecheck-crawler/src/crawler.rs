use crate::error::{CrawlError, Result};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::frontier::Frontier;
use crate::limiter::RateLimiter;
use crate::page::{FetchFailure, Page};
use crate::parse::parse_page;
use crate::robots::RobotsPolicy;
use crate::urls::{host_of, normalize_url, site_root};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

const DEFAULT_USER_AGENT: &str = "sitecheck/0.2 (+https://github.com/trapdoorsec/sitecheck)";

/// A URL that was dispatched but produced no usable response. Diagnostic
/// only; not part of the scored result.
#[derive(Debug, Clone)]
pub struct SkippedUrl {
    pub url: String,
    pub reason: FetchFailure,
}

/// Everything one crawl run produced. The page set is complete and immutable
/// once this is returned.
pub struct CrawlOutcome {
    /// Normalized seed URL.
    pub site: String,
    pub pages: Vec<Page>,
    pub skipped: Vec<SkippedUrl>,
    pub robots_found: bool,
    pub sitemap_found: bool,
    pub crawl_delay: Option<Duration>,
}

/// Bounded single-site crawler: a fixed pool of workers pulls from one
/// shared frontier until it drains or the page budget is reached.
pub struct Crawler {
    user_agent: String,
    max_pages: usize,
    workers: usize,
    connect_timeout: Duration,
    timeout: Duration,
    requests_per_second: f64,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    /// Upper bound on the worker pool; `with_workers` clamps to it.
    pub const MAX_WORKERS: usize = 10;

    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_pages: 50,
            workers: 5,
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            requests_per_second: 4.0,
            progress_callback: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, Self::MAX_WORKERS);
        self
    }

    /// Effective worker pool size after clamping.
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn with_timeouts(mut self, connect: Duration, overall: Duration) -> Self {
        self.connect_timeout = connect;
        self.timeout = overall;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_requests_per_second(mut self, rps: f64) -> Self {
        self.requests_per_second = rps;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Run one crawl. Fails only on an unusable seed; every per-page failure
    /// is absorbed into the outcome.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlOutcome> {
        let seed_url = normalize_url(seed)
            .ok_or_else(|| CrawlError::InvalidUrl(format!("not an http(s) URL: {}", seed)))?;
        let host = host_of(&seed_url)
            .ok_or_else(|| CrawlError::InvalidUrl(format!("no host in {}", seed)))?;
        let root = site_root(&seed_url)
            .ok_or_else(|| CrawlError::InvalidUrl(format!("no site root in {}", seed)))?;

        info!(
            "Starting crawl of {} ({} workers, budget {} pages)",
            seed_url, self.workers, self.max_pages
        );

        let fetcher = Fetcher::new(&self.user_agent, self.connect_timeout, self.timeout)?;

        let robots = RobotsPolicy::fetch(&fetcher, &root, &self.user_agent).await;
        let seed_path = Url::parse(&seed_url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| "/".to_string());
        if !robots.is_allowed(&seed_path) {
            return Err(CrawlError::Seed(format!(
                "robots.txt denies crawling {}",
                seed_path
            )));
        }

        let crawl_delay = robots.crawl_delay();
        let limiter = Arc::new(RateLimiter::new(self.requests_per_second, crawl_delay));

        // Seed fetch happens inline: its failure aborts the run before any
        // page is scanned.
        let mut frontier = Frontier::new(&host, self.max_pages);
        frontier.offer(&seed_url);
        let first = frontier.take().expect("seed was just offered");

        limiter.wait().await;
        let seed_page = match fetcher.fetch(&first).await {
            FetchOutcome::Success(resp) => parse_page(&first, &host, resp),
            FetchOutcome::Failure(f) => {
                return Err(CrawlError::Seed(format!("seed fetch failed: {}", f)));
            }
        };
        frontier.mark_visited(&first);
        for link in seed_page.internal_links() {
            frontier.offer(&link.url);
        }

        let sitemap_found = if robots.sitemaps().is_empty() {
            probe_sitemap(&fetcher, &root).await
        } else {
            true
        };

        let frontier = Arc::new(Mutex::new(frontier));
        let pages = Arc::new(Mutex::new(vec![seed_page]));
        let skipped: Arc<Mutex<Vec<SkippedUrl>>> = Arc::new(Mutex::new(Vec::new()));
        let robots = Arc::new(robots);

        let mut handles = Vec::new();
        for worker_id in 0..self.workers {
            let fetcher = fetcher.clone();
            let frontier = frontier.clone();
            let pages = pages.clone();
            let skipped = skipped.clone();
            let robots = robots.clone();
            let limiter = limiter.clone();
            let host = host.clone();
            let progress = self.progress_callback.clone();

            handles.push(tokio::spawn(async move {
                debug!("Worker {} started", worker_id);
                loop {
                    let url = { frontier.lock().await.take() };
                    let Some(url) = url else {
                        if frontier.lock().await.is_done() {
                            break;
                        }
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        continue;
                    };

                    // Robots gate: denied URLs are dropped, never fetched
                    // and never reported as errors.
                    let path = Url::parse(&url)
                        .map(|u| u.path().to_string())
                        .unwrap_or_else(|_| "/".to_string());
                    if !robots.is_allowed(&path) {
                        debug!("Skipping {} (disallowed by robots.txt)", url);
                        frontier.lock().await.release(&url);
                        continue;
                    }

                    if let Some(ref callback) = progress {
                        callback(worker_id, url.clone());
                    }

                    limiter.wait().await;
                    let page = match fetcher.fetch(&url).await {
                        FetchOutcome::Success(resp) => parse_page(&url, &host, resp),
                        FetchOutcome::Failure(reason) => {
                            warn!("Fetch failed for {}: {}", url, reason);
                            skipped.lock().await.push(SkippedUrl {
                                url: url.clone(),
                                reason: reason.clone(),
                            });
                            Page::with_failure(url.clone(), reason)
                        }
                    };

                    {
                        let mut frontier = frontier.lock().await;
                        frontier.mark_visited(&url);
                        for link in page.internal_links() {
                            frontier.offer(&link.url);
                        }
                    }
                    pages.lock().await.push(page);
                }
                debug!("Worker {} finished", worker_id);
            }));
        }

        for handle in handles {
            handle.await?;
        }

        let pages = Arc::try_unwrap(pages)
            .map_err(|_| CrawlError::Other("page set still shared after join".to_string()))?
            .into_inner();
        let skipped = Arc::try_unwrap(skipped)
            .map_err(|_| CrawlError::Other("skip list still shared after join".to_string()))?
            .into_inner();

        info!(
            "Crawl complete: {} pages, {} skipped",
            pages.len(),
            skipped.len()
        );

        Ok(CrawlOutcome {
            site: seed_url,
            pages,
            skipped,
            robots_found: robots.found(),
            sitemap_found,
            crawl_delay,
        })
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

/// One probe for `/sitemap.xml` when robots.txt listed none.
async fn probe_sitemap(fetcher: &Fetcher, root: &str) -> bool {
    let url = format!("{}/sitemap.xml", root.trim_end_matches('/'));
    match fetcher.fetch(&url).await {
        FetchOutcome::Success(_) => true,
        FetchOutcome::Failure(_) => false,
    }
}
