use thiserror::Error;

/// Everything that can go wrong while scraping a site.
///
/// Only [`CrawlError::Navigation`] and [`CrawlError::Extraction`] are recovered at the
/// page boundary; every other variant ends the crawl.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Extraction from {url} failed: {reason}")]
    Extraction { url: String, reason: String },

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("Browser session error: {0}")]
    Browser(String),

    #[error("Crawl cancelled")]
    Cancelled,

    #[error("Crawl exceeded its deadline of {0} seconds")]
    DeadlineExceeded(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrawlError {
    pub fn navigation(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Navigation {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn extraction(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Extraction {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error only affects the page being processed.
    pub fn is_page_local(&self) -> bool {
        matches!(self, Self::Navigation { .. } | Self::Extraction { .. })
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
