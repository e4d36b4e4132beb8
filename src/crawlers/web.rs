use crate::aggregate::merge;
use crate::config::CrawlConfig;
use crate::crawlers::crawler::{Browser, LoadedPage};
use crate::crawlers::frontier::{Frontier, FrontierItem};
use crate::error::{CrawlError, Result};
use crate::filter::LinkFilter;
use crate::parsers::{ContentExtractor, HtmlPage, PageExtractor, PageHandle};
use crate::results::{AggregatedResult, ExtractedPageData};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Lifecycle of one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Drives the fetch, extract, merge loop over a single browser.
pub struct Orchestrator<B: Browser, E = ContentExtractor> {
    browser: Option<B>,
    config: CrawlConfig,
    extractor: E,
    cancel: CancellationToken,
    state: CrawlState,
}

impl<B: Browser> Orchestrator<B> {
    pub fn new(browser: B, config: CrawlConfig) -> Self {
        Self {
            browser: Some(browser),
            config,
            extractor: ContentExtractor::new(),
            cancel: CancellationToken::new(),
            state: CrawlState::Idle,
        }
    }
}

impl<B: Browser, E: PageExtractor> Orchestrator<B, E> {
    /// Swap in a different page extractor
    pub fn with_extractor<X: PageExtractor>(self, extractor: X) -> Orchestrator<B, X> {
        Orchestrator {
            browser: self.browser,
            config: self.config,
            extractor,
            cancel: self.cancel,
            state: self.state,
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Run the crawl to completion. The browser is closed on every exit path.
    pub async fn run(&mut self) -> Result<AggregatedResult> {
        let Some(mut browser) = self.browser.take() else {
            return Err(CrawlError::Browser("crawl already ran on this browser".into()));
        };

        self.transition(CrawlState::Running);
        let started = std::time::Instant::now();
        let outcome = self.crawl_loop(&mut browser).await;
        browser.close().await;

        match &outcome {
            Ok(result) => {
                self.transition(CrawlState::Completed);
                ::log::info!(
                    "Crawl of {} complete - processed {} pages in {:.2} seconds",
                    self.config.seed_url,
                    result.subpages_scraped.len(),
                    started.elapsed().as_secs_f64()
                );
            }
            Err(e) => {
                self.transition(CrawlState::Failed);
                ::log::error!("Crawl of {} failed: {}", self.config.seed_url, e);
            }
        }
        outcome
    }

    fn transition(&mut self, next: CrawlState) {
        ::log::debug!("Crawl state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    async fn crawl_loop(&self, browser: &mut B) -> Result<AggregatedResult> {
        let mut seed = self.config.seed()?;
        seed.set_fragment(None);
        let filter = LinkFilter::new(&seed, &self.config.exclude_patterns)?;

        let max_depth = self.config.effective_max_depth();
        let max_pages = self.config.max_pages;
        let delay = self.config.politeness_delay();
        let deadline = self.config.total_timeout().map(|t| Instant::now() + t);

        ::log::info!(
            "Starting crawl of {} (max depth {}, max pages {})",
            seed,
            max_depth,
            max_pages
        );

        let mut frontier = Frontier::new(&self.config.priority_path_patterns);
        frontier.enqueue(FrontierItem::new(seed, 0));

        let mut result = AggregatedResult::default();
        let mut pages_processed = 0;
        let mut fetched_before = false;

        loop {
            if self.cancel.is_cancelled() {
                return Err(CrawlError::Cancelled);
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(CrawlError::DeadlineExceeded(
                    self.config.total_timeout_secs.unwrap_or_default(),
                ));
            }
            if pages_processed >= max_pages {
                ::log::debug!("Page budget of {} reached", max_pages);
                break;
            }
            let Some(item) = frontier.dequeue() else {
                break;
            };

            if fetched_before && !delay.is_zero() {
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(CrawlError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            fetched_before = true;

            ::log::info!("Processing {} (depth {})", item.url, item.depth);
            let loaded = match browser.open(&item.url).await {
                Ok(loaded) => loaded,
                Err(e) if e.is_page_local() => {
                    ::log::warn!("Skipping {}: {}", item.url, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let follow_links = item.depth < max_depth;
            let (data, links) = self.process_snapshot(&item, &loaded, &filter, follow_links);
            result = merge(result, data, item.url.as_str());
            pages_processed += 1;

            if follow_links {
                let mut queued = 0;
                for link in links {
                    let url = link.to_string();
                    if frontier.enqueue(FrontierItem::new(link, item.depth + 1)) {
                        ::log::debug!("Queuing link for crawling: {}", url);
                        queued += 1;
                    }
                }
                frontier.reprioritize();
                ::log::debug!(
                    "Queued {} new links from {}, {} pending",
                    queued,
                    item.url,
                    frontier.len()
                );
            }
        }

        Ok(result)
    }

    /// Extracts content and same-origin links from a page snapshot.
    ///
    /// Extraction failures are logged and yield an empty record; the page still counts.
    fn process_snapshot(
        &self,
        item: &FrontierItem,
        loaded: &LoadedPage,
        filter: &LinkFilter,
        follow_links: bool,
    ) -> (ExtractedPageData, Vec<Url>) {
        let page = HtmlPage::parse(&loaded.html, item.url.as_str());

        let data = match self.extractor.extract_page(&page, item.url.as_str()) {
            Ok(data) => data,
            Err(e) => {
                ::log::warn!("Extraction failed for {}: {}", item.url, e);
                ExtractedPageData::default()
            }
        };

        if !follow_links {
            return (data, Vec::new());
        }

        let links = match page.hrefs() {
            Ok(hrefs) => filter.harvest(hrefs.iter().map(String::as_str), &loaded.url),
            Err(e) => {
                ::log::warn!("Could not collect links from {}: {}", item.url, e);
                Vec::new()
            }
        };
        ::log::debug!("Found {} crawlable links in {}", links.len(), item.url);

        (data, links)
    }
}
