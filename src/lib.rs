//! Bounded, same-origin website crawler that turns a company URL into structured
//! research material: title, headings, paragraphs, and about, product, pricing and
//! contact sections merged across the most relevant pages of the site.

pub mod aggregate;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod parsers;
pub mod results;
pub mod utils;

pub use config::{BrowserConfig, CrawlConfig, ScrapeType};
pub use crawlers::{Browser, Orchestrator, WebDriverBrowser};
pub use error::CrawlError;
pub use tokio_util::sync::CancellationToken;
pub use results::{AggregatedResult, ContactInfo, ExtractedPageData, ScrapeRequest, ScrapeResponse};

use crate::filter::LinkFilter;
use std::path::Path;

/// Builder for one scrape of a site
pub struct SiteScrape {
    config: CrawlConfig,
    browser: BrowserConfig,
    cancel: CancellationToken,
}

impl SiteScrape {
    /// Create a builder with default settings for `url`
    pub fn new(url: &str) -> Self {
        Self {
            config: CrawlConfig::new(url),
            browser: BrowserConfig::from_env(),
            cancel: CancellationToken::new(),
        }
    }

    /// Builder for an incoming request, defaults filled in
    pub fn from_request(request: &ScrapeRequest) -> Self {
        Self::new(&request.url).with_config(request.to_config())
    }

    /// Replace the crawl configuration; a config without a seed keeps the current one
    pub fn with_config(mut self, mut config: CrawlConfig) -> Self {
        if config.seed_url.trim().is_empty() {
            config.seed_url = std::mem::take(&mut self.config.seed_url);
        }
        self.config = config;
        self
    }

    /// Load the crawl configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let config = CrawlConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load the crawl configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self, CrawlError> {
        let config = CrawlConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    pub fn with_scrape_type(mut self, scrape_type: ScrapeType) -> Self {
        self.config.scrape_type = scrape_type;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the total timeout (maximum runtime)
    pub fn with_total_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.total_timeout_secs = Some(timeout_seconds);
        self
    }

    pub fn with_browser_config(mut self, browser: BrowserConfig) -> Self {
        self.browser = browser;
        self
    }

    pub fn with_webdriver_url(mut self, webdriver_url: &str) -> Self {
        self.browser.webdriver_url = webdriver_url.to_string();
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Launch a WebDriver browser and crawl the site
    pub async fn run(self) -> ScrapeResponse {
        let url = self.config.seed_url.clone();
        let outcome = match self.validate() {
            Ok(()) => match WebDriverBrowser::launch(&self.browser).await {
                Ok(browser) => self.crawl(browser).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        respond(url, outcome)
    }

    /// Crawl the site with an already running browser, which is closed afterwards
    pub async fn run_with<B: Browser>(self, browser: B) -> ScrapeResponse {
        let url = self.config.seed_url.clone();
        let outcome = match self.validate() {
            Ok(()) => self.crawl(browser).await,
            Err(e) => {
                browser.close().await;
                Err(e)
            }
        };
        respond(url, outcome)
    }

    /// Reject bad seeds and patterns before a browser is involved
    fn validate(&self) -> Result<(), CrawlError> {
        let seed = self.config.seed()?;
        LinkFilter::new(&seed, &self.config.exclude_patterns)?;
        Ok(())
    }

    async fn crawl<B: Browser>(self, browser: B) -> Result<AggregatedResult, CrawlError> {
        Orchestrator::new(browser, self.config)
            .with_cancel_token(self.cancel)
            .run()
            .await
    }
}

fn respond(url: String, outcome: Result<AggregatedResult, CrawlError>) -> ScrapeResponse {
    match outcome {
        Ok(data) => ScrapeResponse::succeeded(url, data),
        Err(e) => {
            ::log::error!("Scrape of {} failed: {}", url, e);
            ScrapeResponse::failed(url, e)
        }
    }
}

/// Handle a scrape request end to end
pub async fn scrape(request: &ScrapeRequest, browser: &BrowserConfig) -> ScrapeResponse {
    SiteScrape::from_request(request)
        .with_browser_config(browser.clone())
        .run()
        .await
}
