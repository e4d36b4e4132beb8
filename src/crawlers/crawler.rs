use crate::error::Result;
use std::future::Future;
use url::Url;

/// Rendered DOM of a page, captured before its tab was closed
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// URL the browser ended up on (after redirects)
    pub url: Url,
    /// Serialized DOM after scripts ran
    pub html: String,
}

/// A browser the orchestrator can drive one page at a time
pub trait Browser {
    /// Load `url` in a fresh tab and snapshot it. The tab is gone once this returns.
    ///
    /// Page-level problems come back as [`crate::CrawlError::Navigation`]; anything
    /// else means the session itself is unusable.
    fn open(&mut self, url: &Url) -> impl Future<Output = Result<LoadedPage>> + Send;

    /// Shut the browser down, releasing every resource it holds
    fn close(self) -> impl Future<Output = ()> + Send;
}
