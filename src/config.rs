use crate::error::{CrawlError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Hard cap on the number of pages one crawl may process.
pub const DEFAULT_MAX_PAGES: usize = 10;

/// How much of the site a crawl should cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeType {
    /// Only the seed page
    Basic,
    /// Seed page plus same-origin subpages within the depth and page budgets
    #[default]
    Comprehensive,
}

/// Configuration for one crawl. Immutable once the crawl starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlConfig {
    /// URL to start crawling from
    #[serde(default)]
    pub seed_url: String,

    #[serde(default)]
    pub scrape_type: ScrapeType,

    /// Maximum link depth below the seed
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum number of pages processed successfully
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Path substrings that move a URL to the front of its depth level
    #[serde(default = "default_priority_paths")]
    pub priority_path_patterns: Vec<String>,

    /// Regex patterns for URLs that are never queued
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Pause between successive page fetches
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Optional deadline for the whole crawl
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_timeout_secs: Option<u64>,
}

/// Configuration for the WebDriver-backed browser
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,

    /// How long to wait for a `body` element after navigation
    #[serde(default = "default_body_wait_secs")]
    pub body_wait_secs: u64,

    /// Quiet window without new resource loads that counts as network idle
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,
}

fn default_max_depth() -> usize {
    2
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_priority_paths() -> Vec<String> {
    ["/about", "/pricing", "/contact", "/products", "/services", "/plans"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        r"(?i)\.(jpg|jpeg|png|gif|webp|css|js|ico|svg|woff|woff2|ttf|eot|pdf|zip|mp4|mp3)$"
            .to_string(),
    ]
}

fn default_politeness_delay_ms() -> u64 {
    500
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string()
}

fn default_navigation_timeout_secs() -> u64 {
    30
}

fn default_body_wait_secs() -> u64 {
    5
}

fn default_network_idle_ms() -> u64 {
    500
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            scrape_type: ScrapeType::default(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            priority_path_patterns: default_priority_paths(),
            exclude_patterns: default_exclude_patterns(),
            politeness_delay_ms: default_politeness_delay_ms(),
            total_timeout_secs: None,
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses the seed, rejecting anything that is not an absolute http(s) URL with a host.
    pub fn seed(&self) -> Result<Url> {
        let url = Url::parse(self.seed_url.trim())
            .map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", self.seed_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(CrawlError::InvalidUrl(self.seed_url.clone()));
        }
        Ok(url)
    }

    /// Depth actually honoured for this scrape type.
    pub fn effective_max_depth(&self) -> usize {
        match self.scrape_type {
            ScrapeType::Basic => 0,
            ScrapeType::Comprehensive => self.max_depth,
        }
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn total_timeout(&self) -> Option<Duration> {
        self.total_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            body_wait_secs: default_body_wait_secs(),
            network_idle_ms: default_network_idle_ms(),
        }
    }
}

impl BrowserConfig {
    /// Defaults, with the WebDriver URL taken from `WEBDRIVER_URL` when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }
        config
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn body_wait(&self) -> Duration {
        Duration::from_secs(self.body_wait_secs)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config = CrawlConfig::from_json(r#"{"seedUrl": "https://site.com"}"#).unwrap();
        assert_eq!(config.scrape_type, ScrapeType::Comprehensive);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.max_pages, 10);
        assert_eq!(config.politeness_delay_ms, 500);
        assert!(config.priority_path_patterns.contains(&"/about".to_string()));
        assert!(config.total_timeout_secs.is_none());
    }

    #[test]
    fn test_basic_scrape_stays_on_seed() {
        let mut config = CrawlConfig::new("https://site.com");
        config.max_depth = 3;
        assert_eq!(config.effective_max_depth(), 3);
        config.scrape_type = ScrapeType::Basic;
        assert_eq!(config.effective_max_depth(), 0);
    }

    #[test]
    fn test_seed_validation() {
        assert!(CrawlConfig::new("https://site.com/a").seed().is_ok());
        assert!(matches!(
            CrawlConfig::new("not a url").seed(),
            Err(CrawlError::InvalidUrl(_))
        ));
        assert!(matches!(
            CrawlConfig::new("ftp://site.com").seed(),
            Err(CrawlError::InvalidUrl(_))
        ));
        assert!(matches!(
            CrawlConfig::new("mailto:a@b.com").seed(),
            Err(CrawlError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_scrape_type_wire_names() {
        let config =
            CrawlConfig::from_json(r#"{"seedUrl": "https://a.io", "scrapeType": "basic"}"#)
                .unwrap();
        assert_eq!(config.scrape_type, ScrapeType::Basic);
        assert!(CrawlConfig::from_json(r#"{"seedUrl": "x", "scrapeType": "deep"}"#).is_err());
    }

    #[test]
    fn test_config_file_without_seed() {
        let config = CrawlConfig::from_json(r#"{"maxPages": 5}"#).unwrap();
        assert!(config.seed_url.is_empty());
        assert_eq!(config.max_pages, 5);
    }

    #[test]
    fn test_browser_defaults() {
        let config = BrowserConfig::default();
        assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
        assert_eq!(config.body_wait(), Duration::from_secs(5));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }
}
