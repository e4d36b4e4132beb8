use crate::config::{CrawlConfig, ScrapeType};
use serde::{Deserialize, Serialize};

/// Contact details found on a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub social_links: Vec<String>,
}

/// What the extractor pulled out of a single page.
///
/// Every field may be empty; absence means "not found on this page".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_info: Option<String>,
    pub contact_info: ContactInfo,
}

/// All successfully processed pages folded into one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResult {
    #[serde(flatten)]
    pub content: ExtractedPageData,
    /// URLs in the order they were processed
    pub subpages_scraped: Vec<String>,
}

/// Input accepted from the HTTP layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_type: Option<ScrapeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            scrape_type: None,
            max_depth: None,
        }
    }

    /// Crawl configuration with request values applied over the defaults
    pub fn to_config(&self) -> CrawlConfig {
        let mut config = CrawlConfig::new(&self.url);
        if let Some(scrape_type) = self.scrape_type {
            config.scrape_type = scrape_type;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        config
    }
}

/// Final outcome handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResponse {
    pub success: bool,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AggregatedResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResponse {
    pub fn succeeded(url: impl Into<String>, data: AggregatedResult) -> Self {
        Self {
            success: true,
            url: url.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl ToString) -> Self {
        Self {
            success: false,
            url: url.into(),
            data: None,
            error: Some(error.to_string()),
        }
    }
}
